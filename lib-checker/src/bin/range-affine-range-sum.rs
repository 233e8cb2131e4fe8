use std::io::{self, BufWriter, Write};

use lib_checker::QueryKind;
use proconio::input;
use segtree::{lazy::LazySegtree, operation};

const MOD: u64 = 998_244_353;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_checker::init_logging();
    input! {
        n: usize,
        q: usize,
        a: [u64; n],
    }
    tracing::info!(n, q, "range affine range sum");

    let sum = operation::monoid(0u64, |a: &u64, b: &u64| (a + b) % MOD);
    // (b, c) は x -> bx + c を表す
    let affine = operation::lazy_fn(
        (1u64, 0u64),
        |&v: &u64, &(b, c): &(u64, u64), l: usize, r: usize| {
            (b * v + c * (r - l + 1) as u64 % MOD) % MOD
        },
        |&(b1, c1): &(u64, u64), &(b2, c2): &(u64, u64)| (b1 * b2 % MOD, (b2 * c1 + c2) % MOD),
    );
    let mut segtree = LazySegtree::from_iter_op(a, sum, affine);
    let mut out = BufWriter::new(io::stdout().lock());
    for _ in 0..q {
        input! {
            t: u8,
            l: usize,
            r: usize,
        }
        match QueryKind::try_from(t)? {
            QueryKind::Update => {
                input! {
                    b: u64,
                    c: u64,
                }
                segtree.update(l..r, (b, c));
            }
            QueryKind::Query => writeln!(out, "{}", segtree.query(l..r))?,
        }
    }
    out.flush()?;
    Ok(())
}
