#[cfg(feature = "async")]
mod async_stream;
mod drivers;
mod parse_good;
mod support;
