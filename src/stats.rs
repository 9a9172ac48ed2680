//! Message length distribution, rendered as a text histogram in the log.

use crate::outreach::OutreachTable;

pub const DEFAULT_BINS: usize = 14;

/// One histogram bucket covering word counts `lo..=hi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub lo: usize,
    pub hi: usize,
    pub count: usize,
}

/// Whitespace-token count of every rendered message, in row order.
pub fn word_counts(table: &OutreachTable) -> Vec<usize> {
    table
        .rows
        .iter()
        .map(|r| r.outreach_message().split_whitespace().count())
        .collect()
}

/// Split `[min, max]` into at most `bins` equal-width integer buckets.
/// Empty input or `bins == 0` yields no buckets.
pub fn histogram(counts: &[usize], bins: usize) -> Vec<Bucket> {
    let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let span = max - min + 1;
    let width = span.div_ceil(bins).max(1);
    let n = span.div_ceil(width);

    let mut buckets: Vec<Bucket> = (0..n)
        .map(|i| Bucket { lo: min + i * width, hi: (min + (i + 1) * width - 1).min(max), count: 0 })
        .collect();
    for &c in counts {
        buckets[(c - min) / width].count += 1;
    }
    buckets
}

/// One line per bucket: `"  70-74 | ##### 5"`.
pub fn render_histogram(buckets: &[Bucket]) -> String {
    let peak = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    let label_width = buckets
        .iter()
        .map(|b| label(b).len())
        .max()
        .unwrap_or(0);

    buckets
        .iter()
        .map(|b| {
            let bar = if peak == 0 { 0 } else { (b.count * 40).div_ceil(peak) };
            format!("{:>label_width$} | {} {}", label(b), "#".repeat(bar), b.count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn label(b: &Bucket) -> String {
    if b.lo == b.hi { b.lo.to_string() } else { format!("{}-{}", b.lo, b.hi) }
}
