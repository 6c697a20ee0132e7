use super::decode::{Decoder, Length};
use super::error::DecodeError;

/// Walks the items of an array (`D == 1`) or the key/value pairs of a map
/// (`D == 2`), definite or indefinite.
///
/// Each successful [`next_item`](Sequence::next_item) hands back the
/// decoder positioned at the next item (or pair); the caller reads exactly
/// `D` values from it before asking again.
///
/// An open sequence counts as one level of nesting for any skip made through
/// it, so limits apply the same as to a single [`Decoder::skip`]. Dropping
/// the sequence closes that level.
#[derive(Debug)]
pub struct Sequence<'d, 'a, const D: usize> {
    decoder: &'d mut Decoder<'a>,
    len: Length,
    level: usize,
    parsed: usize,
    done: bool,
}

pub type ArrayItems<'d, 'a> = Sequence<'d, 'a, 1>;
pub type ObjectEntries<'d, 'a> = Sequence<'d, 'a, 2>;

impl<'d, 'a, const D: usize> Sequence<'d, 'a, D> {
    pub(super) fn new(decoder: &'d mut Decoder<'a>, len: Length) -> Self {
        let level = decoder.enter_sequence();
        Self {
            decoder,
            len,
            level,
            parsed: 0,
            done: false,
        }
    }

    /// The declared count, or `None` for an indefinite-length sequence.
    pub fn len(&self) -> Option<usize> {
        self.len.definite()
    }

    pub fn is_definite(&self) -> bool {
        self.len.definite().is_some()
    }

    /// Number of items (or pairs) handed out so far.
    pub fn parsed(&self) -> usize {
        self.parsed
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    pub fn next_item(&mut self) -> Result<Option<&mut Decoder<'a>>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        let more = match self.len {
            Length::Definite(count) => self.parsed < count,
            Length::Indefinite => !self.decoder.at_break()?,
        };
        if !more {
            self.done = true;
            return Ok(None);
        }
        self.parsed += 1;
        Ok(Some(&mut *self.decoder))
    }

    /// Discard every remaining item, keys and values alike for maps.
    pub fn skip_to_end(&mut self) -> Result<(), DecodeError> {
        let level = self.level;
        while let Some(decoder) = self.next_item()? {
            for _ in 0..D {
                decoder.skip_value(level)?;
            }
        }
        Ok(())
    }
}

impl<const D: usize> Drop for Sequence<'_, '_, D> {
    fn drop(&mut self) {
        self.decoder.leave_sequence(self.level);
    }
}
