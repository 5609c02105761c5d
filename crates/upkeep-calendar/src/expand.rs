//! Recurrence expansion for calendar event definitions.
//!
//! Expansion turns one definition into the occurrences a calendar view may
//! need: the original, followed by up to [`RecurFrequency::generation_cap`]
//! generated recurrences. The count is bounded by the cap alone. Occurrences
//! that start before the window are still produced; filtering them out for
//! display is left to the caller.

use std::iter::FusedIterator;

use crate::frequency::RecurFrequency;
use crate::model::{EventDefinition, EventInstance};
use crate::window::Window;

/// ## Summary
/// Expands `definition` into its occurrences for `window`.
///
/// Non-recurring definitions and materialized recurrences yield exactly one
/// instance, the original. Recurring definitions yield the original followed
/// by `generation_cap` recurrences, each offset from the original by
/// `occurrence_index` recurrence steps.
///
/// The returned iterator is lazy and cheap to clone; cloning it before
/// consumption restarts the sequence.
#[must_use]
pub fn expand<'a>(definition: &'a EventDefinition, window: &Window) -> Recurrences<'a> {
    let frequency = definition.effective_frequency();
    let cap = frequency.generation_cap();

    tracing::trace!(
        event_id = %definition.id,
        frequency = %frequency,
        cap,
        window_start = %window.start(),
        window_end = %window.end(),
        "Expanding event definition"
    );

    Recurrences {
        definition,
        frequency,
        window: *window,
        next_index: 0,
        last_index: cap,
        exhausted: false,
    }
}

/// Lazy sequence of the occurrences of one event definition.
#[derive(Debug, Clone)]
pub struct Recurrences<'a> {
    definition: &'a EventDefinition,
    frequency: RecurFrequency,
    window: Window,
    next_index: u32,
    last_index: u32,
    exhausted: bool,
}

impl<'a> Recurrences<'a> {
    #[must_use]
    pub const fn frequency(&self) -> RecurFrequency {
        self.frequency
    }

    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// ## Summary
    /// Stops the sequence at the first occurrence starting after the window end.
    ///
    /// Occurrences are produced in start order, so nothing visible is lost.
    /// Occurrences before the window start are still produced.
    pub fn until_window_end(self) -> impl Iterator<Item = EventInstance> + Clone + 'a {
        let end = self.window.end();
        self.take_while(move |instance| instance.start <= end)
    }

    fn remaining(&self) -> usize {
        if self.exhausted || self.next_index > self.last_index {
            return 0;
        }
        usize::try_from(self.last_index - self.next_index + 1).unwrap_or(usize::MAX)
    }
}

impl Iterator for Recurrences<'_> {
    type Item = EventInstance;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        let index = self.next_index;
        let start = self.frequency.advance(self.definition.start, index);
        let end = self.frequency.advance(self.definition.end, index);
        let (Some(start), Some(end)) = (start, end) else {
            tracing::trace!(
                event_id = %self.definition.id,
                occurrence_index = index,
                "Occurrence outside representable range, ending expansion"
            );
            self.exhausted = true;
            return None;
        };

        self.next_index += 1;
        Some(EventInstance {
            source_definition_id: self.definition.id,
            occurrence_index: index,
            start,
            end,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl FusedIterator for Recurrences<'_> {}
