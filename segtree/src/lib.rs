mod build;
mod error;
pub mod index;
pub mod lazy;
pub mod operation;
pub mod persistent;

pub use error::{Result, SegtreeError};
pub use lazy::LazySegtree;
pub use persistent::PersistentSegtree;

use build::Flat;
use index::Segment;
use operation::{Idempotent, Operator};
use std::{
    iter,
    ops::{Deref, DerefMut, RangeBounds},
};

/// 一点更新・区間取得のセグメント木。
///
/// 頂点は`index`モジュールの配置で長さ`2n - 1`の配列に詰め込まれる。
#[derive(Debug, Clone)]
pub struct Segtree<T, OP> {
    len: usize,
    data: Box<[T]>,
    op: OP,
}

impl<T, OP> Segtree<T, OP> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn operator(&self) -> &OP {
        &self.op
    }

    /// 位置`pos`の値への参照。O(log(n))。
    pub fn get(&self, pos: usize) -> Result<&T> {
        let leaf = error::root_for(pos, self.len)?.leaf_of(pos);
        Ok(&self.data[leaf.index])
    }

    /// 値を添字順に列挙する。
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        index::leaves(self.len).map(move |leaf| &self.data[leaf.index])
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut leaves = index::leaves(self.len).map(|leaf| leaf.index).peekable();
        self.data
            .into_vec()
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| leaves.next_if_eq(&i).map(|_| value))
            .collect()
    }
}

impl<T, OP: Operator<Query = T>> Segtree<T, OP> {
    /// すべての値が単位元の、長さ`len`のセグメント木。
    pub fn new(len: usize, op: OP) -> Self {
        tracing::trace!(len, "created segment tree");
        let data = iter::repeat_with(|| op.ident())
            .take(index::storage_len(len))
            .collect();
        Self { len, data, op }
    }

    pub fn from_iter_op<I: IntoIterator<Item = T>>(iter: I, op: OP) -> Self {
        let source = iter.into_iter().collect::<Vec<_>>();
        let mut segtree = Self::new(source.len(), op);
        segtree.assemble(source);
        segtree
    }

    fn assemble(&mut self, source: Vec<T>) {
        build::build(
            self.len,
            source,
            &mut Flat {
                data: &mut self.data,
                op: &self.op,
            },
        );
    }

    /// 木全体を`source`で作り直す。O(n)。
    ///
    /// `source`の長さは`self.len()`と等しくなければならない。
    pub fn build_from<I: IntoIterator<Item = T>>(&mut self, source: I) -> Result<()> {
        let source = build::collect_exact(source, self.len)?;
        self.assemble(source);
        Ok(())
    }

    fn eval(&mut self, seg: Segment) {
        let (l, r) = seg.children();
        self.data[seg.index] = self.op.op(&self.data[l.index], &self.data[r.index]);
    }

    fn modify_leaf<F>(&mut self, seg: Segment, pos: usize, f: F)
    where
        F: FnOnce(&OP, &mut T),
    {
        if seg.is_leaf() {
            f(&self.op, &mut self.data[seg.index]);
        } else {
            self.modify_leaf(seg.child_towards(pos), pos, f);
            self.eval(seg);
        }
    }

    /// 位置`pos`の値を`value`で置き換える。
    pub fn set(&mut self, pos: usize, value: T) -> Result<()> {
        let root = error::root_for(pos, self.len)?;
        self.modify_leaf(root, pos, |_, leaf| *leaf = value);
        Ok(())
    }

    /// 位置`pos`の値`a`を`op(a, value)`で置き換える。
    pub fn update(&mut self, pos: usize, value: T) -> Result<()> {
        let root = error::root_for(pos, self.len)?;
        self.modify_leaf(root, pos, |op, leaf| *leaf = op.op(leaf, &value));
        Ok(())
    }

    pub fn get_mut(&mut self, pos: usize) -> Result<ValMut<'_, T, OP>> {
        let leaf = error::root_for(pos, self.len)?.leaf_of(pos);
        Ok(ValMut {
            index: leaf.index,
            pos,
            segtree: self,
        })
    }

    fn refresh(&mut self, pos: usize) {
        if let Some(root) = Segment::root(self.len) {
            self.modify_leaf(root, pos, |_, _| {});
        }
    }

    /// 区間に含まれる値を`op`で畳み込んだ値。
    ///
    /// 範囲外の部分は無視され、空の区間に対しては単位元を返す。
    pub fn query<R: RangeBounds<usize>>(&self, range: R) -> T
    where
        T: Clone,
    {
        match (Segment::root(self.len), index::inclusive_bounds(range, self.len)) {
            (Some(root), Some((l, r))) => self.query_inner(root, l, r),
            _ => self.op.ident(),
        }
    }

    fn query_inner(&self, seg: Segment, l: usize, r: usize) -> T
    where
        T: Clone,
    {
        if seg.is_disjoint(l, r) {
            self.op.ident()
        } else if seg.is_covered_by(l, r) {
            self.data[seg.index].clone()
        } else {
            let (lc, rc) = seg.children();
            self.op
                .op(&self.query_inner(lc, l, r), &self.query_inner(rc, l, r))
        }
    }

    /// 全体を畳み込んだ値。O(1)。
    pub fn all(&self) -> T
    where
        T: Clone,
    {
        self.data.first().cloned().unwrap_or_else(|| self.op.ident())
    }

    /// `pred(self.query(l..j))`が`true`となる最大の`j`をO(log(n))で求める。
    ///
    /// `pred(ident)`は`true`で、`pred`は区間を伸ばすと`true`から`false`に一度だけ変わる必要がある。
    pub fn upper_bound<P>(&self, l: usize, mut pred: P) -> Result<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if l == self.len {
            return Ok(l);
        }
        let root = error::root_for(l, self.len)?;
        let mut acc = self.op.ident();
        Ok(self
            .upper_bound_inner(root, l, &mut acc, &mut pred)
            .unwrap_or(self.len))
    }

    fn upper_bound_inner<P>(&self, seg: Segment, l: usize, acc: &mut T, pred: &mut P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if seg.right < l {
            return None;
        }
        if l <= seg.left {
            let next = self.op.op(acc, &self.data[seg.index]);
            if pred(&next) {
                *acc = next;
                return None;
            }
            if seg.is_leaf() {
                return Some(seg.left);
            }
        }
        let (lc, rc) = seg.children();
        self.upper_bound_inner(lc, l, acc, pred)
            .or_else(|| self.upper_bound_inner(rc, l, acc, pred))
    }

    /// `pred(self.query(j..r))`が`true`となる最小の`j`をO(log(n))で求める。
    pub fn lower_bound<P>(&self, r: usize, mut pred: P) -> Result<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if r > self.len {
            return Err(SegtreeError::IndexOutOfBounds {
                index: r,
                len: self.len,
            });
        }
        let Some(root) = Segment::root(self.len).filter(|_| r > 0) else {
            return Ok(0);
        };
        let mut acc = self.op.ident();
        Ok(self
            .lower_bound_inner(root, r, &mut acc, &mut pred)
            .unwrap_or(0))
    }

    fn lower_bound_inner<P>(&self, seg: Segment, r: usize, acc: &mut T, pred: &mut P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        if seg.left >= r {
            return None;
        }
        if seg.right < r {
            let next = self.op.op(&self.data[seg.index], acc);
            if pred(&next) {
                *acc = next;
                return None;
            }
            if seg.is_leaf() {
                return Some(seg.left + 1);
            }
        }
        let (lc, rc) = seg.children();
        self.lower_bound_inner(rc, r, acc, pred)
            .or_else(|| self.lower_bound_inner(lc, r, acc, pred))
    }
}

impl<T, OP: Idempotent<Query = T>> Segtree<T, OP> {
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    /// fは呼ばれるたびに同じ値を返す必要がある。そうでない場合、セグメント木の性質が壊れる。
    pub fn fill_with<F: FnMut() -> T>(&mut self, f: F) {
        self.data.fill_with(f);
    }
}

/// 値への可変参照。drop時に祖先を計算し直す。
pub struct ValMut<'a, T, OP: Operator<Query = T>> {
    segtree: &'a mut Segtree<T, OP>,
    index: usize,
    pos: usize,
}

impl<'a, T, OP: Operator<Query = T>> Deref for ValMut<'a, T, OP> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.segtree.data[self.index]
    }
}

impl<'a, T, OP: Operator<Query = T>> DerefMut for ValMut<'a, T, OP> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.segtree.data[self.index]
    }
}

impl<'a, T, OP: Operator<Query = T>> Drop for ValMut<'a, T, OP> {
    fn drop(&mut self) {
        self.segtree.refresh(self.pos);
    }
}

impl<I, OP> FromIterator<I> for Segtree<I, OP>
where
    OP: Default + Operator<Query = I>,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::from_iter_op(iter, OP::default())
    }
}

impl<T, OP> From<Segtree<T, OP>> for Vec<T> {
    fn from(value: Segtree<T, OP>) -> Self {
        value.into_vec()
    }
}
