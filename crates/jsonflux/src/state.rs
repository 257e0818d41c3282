//! Resumable parse state.
//!
//! Parsing runs as recursive descent over the target type, but every level
//! checks its partial progress into an explicit [`Frame`] stack owned by the
//! [`ReadState`]. When input runs out mid-value the whole descent unwinds
//! with each level parked; the next attempt re-descends through the parked
//! frames and continues from the exact same shape. The frame push/pop
//! mirrors what native call/return would otherwise record.

use core::any::Any;
use core::fmt;
use core::mem;

use crate::graph::MemberGraph;
use crate::literal::LiteralMatcher;
use crate::number::{NumberAcc, NumberStage};
use crate::options::JsonOptions;
use crate::string::StringProgress;
use crate::unit::CodeUnit;

/// Progress through an object's member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberStep {
    /// Just past the opening brace; an empty object may close here.
    First,
    /// Reading a property name.
    Key,
    /// Expecting the colon after a property name.
    Colon,
    /// Reading the member's value.
    Value,
    /// Discarding the value of a pruned or unknown member.
    Drain,
    /// Expecting a comma or the closing brace.
    Separator,
}

/// Progress through an array's element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementStep {
    /// Just past the opening bracket; an empty array may close here.
    First,
    /// Reading an element value.
    Value,
    /// Discarding an element beyond the target's known members.
    Drain,
    /// Expecting a comma or the closing bracket.
    Separator,
}

/// One suspended parse context.
///
/// A frame carries only the partial progress relevant to its kind; partially
/// built composite values ride along as boxed work so generic converters of
/// any element type share the same frame shape.
pub(crate) enum Frame<U: CodeUnit> {
    /// Dispatching on the first significant unit of a value. With `draining`
    /// set, a mismatched value is being consumed and discarded.
    Value { draining: bool },
    /// A quoted literal that will convert to a non-string target.
    StringToType { progress: StringProgress<U> },
    /// A string literal.
    String { progress: StringProgress<U> },
    /// A typed object in name/value form.
    Object {
        step: MemberStep,
        property: Option<String>,
        work: Option<Box<dyn Any>>,
    },
    /// A string-keyed dictionary.
    Dictionary {
        step: MemberStep,
        key: Option<String>,
        work: Option<Box<dyn Any>>,
    },
    /// An array of elements.
    Array {
        step: ElementStep,
        work: Option<Box<dyn Any>>,
    },
    /// A typed object in nameless (positional array) form.
    ArrayNameless {
        step: ElementStep,
        index: usize,
        work: Option<Box<dyn Any>>,
    },
    /// A keyword literal (`null`, `true`, `false`).
    Literal { matcher: LiteralMatcher },
    /// A numeric literal; the accumulators live on the read state.
    LiteralNumber { stage: NumberStage },
}

impl<U: CodeUnit> fmt::Debug for Frame<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Value { draining } => f.debug_struct("Value").field("draining", draining).finish(),
            Frame::StringToType { progress } => {
                f.debug_struct("StringToType").field("progress", progress).finish()
            }
            Frame::String { progress } => {
                f.debug_struct("String").field("progress", progress).finish()
            }
            Frame::Object { step, property, .. } => f
                .debug_struct("Object")
                .field("step", step)
                .field("property", property)
                .finish_non_exhaustive(),
            Frame::Dictionary { step, key, .. } => f
                .debug_struct("Dictionary")
                .field("step", step)
                .field("key", key)
                .finish_non_exhaustive(),
            Frame::Array { step, .. } => {
                f.debug_struct("Array").field("step", step).finish_non_exhaustive()
            }
            Frame::ArrayNameless { step, index, .. } => f
                .debug_struct("ArrayNameless")
                .field("step", step)
                .field("index", index)
                .finish_non_exhaustive(),
            Frame::Literal { matcher } => {
                f.debug_struct("Literal").field("matcher", matcher).finish()
            }
            Frame::LiteralNumber { stage } => {
                f.debug_struct("LiteralNumber").field("stage", stage).finish()
            }
        }
    }
}

/// Per-call parse state threaded through every converter.
///
/// Created fresh for each top-level deserialization and discarded at its
/// end. Between fill rounds the frame stack holds every suspended level; a
/// converter checks its frame out with [`ReadState::begin`] while it runs
/// (the "current frame" of the stack top) and either parks it back or
/// completes it.
#[derive(Debug)]
pub struct ReadState<U: CodeUnit> {
    stack: Vec<Frame<U>>,
    /// Number of frames currently checked out by the running descent.
    depth: usize,
    /// Minimum additional units required before a retry can progress.
    /// Zero means progress was made or parsing finished.
    pub(crate) needed: usize,
    /// No further input will arrive after the current span.
    pub(crate) is_final_block: bool,
    /// Units consumed by earlier fill rounds, for diagnostics.
    pub(crate) base_offset: usize,

    pub(crate) nameless: bool,
    pub(crate) error_on_type_mismatch: bool,
    pub(crate) enum_as_number: bool,
    pub(crate) suppress_null_properties: bool,
    pub(crate) graph: Option<MemberGraph>,

    /// Accumulators for the innermost in-flight numeric literal.
    pub(crate) number: NumberAcc,
}

impl<U: CodeUnit> ReadState<U> {
    /// Creates the state for one deserialization call.
    #[must_use]
    pub fn new(options: &JsonOptions, graph: Option<MemberGraph>) -> Self {
        Self {
            stack: Vec::with_capacity(8),
            depth: 0,
            needed: 0,
            is_final_block: false,
            base_offset: 0,
            nameless: options.nameless,
            error_on_type_mismatch: options.error_on_type_mismatch,
            enum_as_number: options.enum_as_number,
            suppress_null_properties: options.do_not_write_null_properties,
            graph,
            number: NumberAcc::default(),
        }
    }

    /// Checks out this depth's frame: the parked frame when resuming, or
    /// `fresh` on first entry.
    pub(crate) fn begin(&mut self, fresh: Frame<U>) -> Frame<U> {
        let frame = if self.depth < self.stack.len() {
            mem::replace(&mut self.stack[self.depth], Frame::Value { draining: false })
        } else {
            self.stack.push(Frame::Value { draining: false });
            fresh
        };
        self.depth += 1;
        frame
    }

    /// Parks the frame back for resumption. Inner frames park first as the
    /// suspension unwinds, so the stack keeps its exact shape.
    pub(crate) fn park(&mut self, frame: Frame<U>) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
        self.stack[self.depth] = frame;
    }

    /// Pops this depth's frame after its value was fully produced. The
    /// parent receives the result through the converter's return value and
    /// never reaches into the popped frame.
    pub(crate) fn complete(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
        self.stack.truncate(self.depth);
    }

    /// Records the minimum additional input required before retrying.
    pub(crate) fn need(&mut self, units: usize) {
        self.needed = units.max(1);
    }

    /// Resets the numeric accumulators for a literal that is about to begin.
    pub(crate) fn begin_number(&mut self) {
        self.number.reset();
    }

    /// The shape graph, visible only to the root-level object converter;
    /// nested objects receive their subgraph from their parent.
    pub(crate) fn inherited_root_graph(&self) -> Option<MemberGraph> {
        if self.depth == 1 {
            self.graph.clone()
        } else {
            None
        }
    }

    /// Accounts units retired from the buffer by the driver.
    pub(crate) fn add_consumed(&mut self, units: usize) {
        self.base_offset += units;
    }

    /// Whether the whole descent has unwound (no frames checked out).
    pub(crate) fn unwound(&self) -> bool {
        self.depth == 0
    }

    /// Whether a child of the currently running converter is parked below,
    /// i.e. this invocation is resuming a suspended delegation rather than
    /// dispatching fresh input.
    pub(crate) fn resuming_child(&self) -> bool {
        self.depth < self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = ReadState<u8>;

    #[test]
    fn begin_park_resume_round_trip() {
        let mut state = State::new(&JsonOptions::default(), None);
        let outer = state.begin(Frame::Array {
            step: ElementStep::First,
            work: None,
        });
        assert!(matches!(outer, Frame::Array { .. }));
        let inner = state.begin(Frame::LiteralNumber {
            stage: NumberStage::default(),
        });
        // Suspension parks inner-out.
        state.park(inner);
        state.park(outer);
        assert!(state.unwound());

        // Resumption hands back the parked frames in descent order.
        let outer = state.begin(Frame::Value { draining: false });
        assert!(matches!(outer, Frame::Array { .. }));
        let inner = state.begin(Frame::Value { draining: false });
        assert!(matches!(inner, Frame::LiteralNumber { .. }));
        state.complete();
        state.complete();
        assert!(state.unwound());
    }

    #[test]
    fn complete_discards_frame() {
        let mut state = State::new(&JsonOptions::default(), None);
        let frame = state.begin(Frame::Value { draining: false });
        drop(frame);
        state.complete();
        // A new descent starts fresh rather than resuming.
        let frame = state.begin(Frame::Literal {
            matcher: LiteralMatcher::begin(b'n').unwrap(),
        });
        assert!(matches!(frame, Frame::Literal { .. }));
    }

    #[test]
    fn need_never_records_zero() {
        let mut state = State::new(&JsonOptions::default(), None);
        state.need(0);
        assert_eq!(state.needed, 1);
        state.need(6);
        assert_eq!(state.needed, 6);
    }

    #[test]
    fn options_are_copied_in() {
        let options = JsonOptions {
            nameless: true,
            error_on_type_mismatch: true,
            enum_as_number: true,
            do_not_write_null_properties: true,
            ..JsonOptions::default()
        };
        let state = State::new(&options, None);
        assert!(state.nameless);
        assert!(state.error_on_type_mismatch);
        assert!(state.enum_as_number);
        assert!(state.suppress_null_properties);
    }
}
