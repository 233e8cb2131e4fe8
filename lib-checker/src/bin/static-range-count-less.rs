//! 各クエリ`l r x`に対して、`l <= i < r`かつ`a[i] < x`を満たす`i`の個数を答える。
use std::io::{self, BufWriter, Write};

use proconio::input;
use segtree::{operation, PersistentSegtree};

const MAX_VALUE: usize = 1_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_checker::init_logging();
    input! {
        n: usize,
        q: usize,
        a: [usize; n],
    }
    tracing::info!(n, q, "static range count less");

    // versions[i]は先頭i個の値の出現回数
    let mut versions = Vec::with_capacity(n + 1);
    versions.push(PersistentSegtree::new(MAX_VALUE + 1, operation::add::<u32>()));
    for (i, &x) in a.iter().enumerate() {
        let next = versions[i].update(x, 1)?;
        versions.push(next);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    for _ in 0..q {
        input! {
            l: usize,
            r: usize,
            x: usize,
        }
        let count = versions[r].query(..x) - versions[l].query(..x);
        writeln!(out, "{count}")?;
    }
    out.flush()?;
    Ok(())
}
