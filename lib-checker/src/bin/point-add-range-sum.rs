use std::io::{self, BufWriter, Write};

use lib_checker::QueryKind;
use proconio::input;
use segtree::{operation, Segtree};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_checker::init_logging();
    input! {
        n: usize,
        q: usize,
        a: [u64; n],
    }
    tracing::info!(n, q, "point add range sum");

    let mut segtree = a.into_iter().collect::<Segtree<_, operation::Add<_>>>();
    let mut out = BufWriter::new(io::stdout().lock());
    for _ in 0..q {
        input! {
            t: u8,
            u: usize,
            v: u64,
        }
        match QueryKind::try_from(t)? {
            QueryKind::Update => segtree.update(u, v)?,
            QueryKind::Query => writeln!(out, "{}", segtree.query(u..v as usize))?,
        }
    }
    out.flush()?;
    Ok(())
}
