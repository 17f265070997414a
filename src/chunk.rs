//! Token-bounded chunk assembly.
//!
//! Merges consecutive fragments into [`Chunk`]s whose whitespace-token count
//! stays within `max_tokens`, using a single greedy pass with no
//! backtracking: accumulate fragments until the next one would overflow the
//! budget, flush, continue. A lone fragment larger than the budget is never
//! split — splitting mid-fragment would desynchronize the chunk's text from
//! its markup — so it is flushed alone as one oversized chunk.

use crate::models::{Chunk, Fragment};

/// Pending fragment texts and markups plus the running token count.
#[derive(Default)]
struct Accumulator {
    texts: Vec<String>,
    markups: Vec<String>,
    token_count: usize,
}

impl Accumulator {
    fn flush(&mut self, chunks: &mut Vec<Chunk>) {
        if self.texts.is_empty() {
            return;
        }
        chunks.push(Chunk {
            text: self.texts.join(" "),
            markup: self.markups.concat(),
            token_count: self.token_count,
        });
        self.texts.clear();
        self.markups.clear();
        self.token_count = 0;
    }
}

/// Merge an ordered fragment sequence into token-bounded chunks.
///
/// Chunks preserve fragment order, and concatenating the output chunks'
/// texts and markups reproduces the input sequence exactly. Every chunk's
/// `token_count` is at most `max_tokens`, except a chunk holding exactly one
/// fragment that alone exceeds the budget.
pub fn assemble(fragments: &[Fragment], max_tokens: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut acc = Accumulator::default();

    for fragment in fragments {
        let tokens = fragment.text.split_whitespace().count();
        // Defensive: the extractor's five-token floor makes this unreachable.
        if tokens == 0 {
            continue;
        }
        if acc.token_count + tokens > max_tokens {
            acc.flush(&mut chunks);
        }
        acc.texts.push(fragment.text.clone());
        acc.markups.push(fragment.markup.clone());
        acc.token_count += tokens;
    }

    acc.flush(&mut chunks);
    chunks
}
