use std::{iter, mem, ops::RangeBounds};

use super::{
    build, error,
    index::{self, Segment},
    operation::{Map, Operator},
    Result, Segtree,
};

/// 区間作用・区間取得のセグメント木。
///
/// 頂点の値を読む前、または頂点より下に降りる前には必ず`propagate`を呼ぶ。
/// そうすれば読んだ値は常に保留中の作用素をすべて反映している。
#[derive(Debug, Clone)]
pub struct LazySegtree<T, F, OP, M> {
    len: usize,
    data: Box<[T]>,
    lazy: Box<[F]>,
    op: OP,
    map: M,
}

impl<T, F, OP, M> LazySegtree<T, F, OP, M> {
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T, F, OP: Operator<Query = T>, M: Map<Query = T, Elem = F>> LazySegtree<T, F, OP, M> {
    pub fn new(len: usize, op: OP, map: M) -> Self {
        Self::from_segtree(Segtree::new(len, op), map)
    }

    pub fn from_iter_op<I>(iter: I, op: OP, map: M) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_segtree(Segtree::from_iter_op(iter, op), map)
    }

    pub fn from_segtree(segtree: Segtree<T, OP>, map: M) -> Self {
        let Segtree { len, data, op } = segtree;
        let lazy = iter::repeat_with(|| map.ident()).take(data.len()).collect();
        Self {
            len,
            data,
            lazy,
            op,
            map,
        }
    }

    /// 木全体を`source`で作り直し、保留中の作用素をすべて捨てる。
    pub fn build_from<I: IntoIterator<Item = T>>(&mut self, source: I) -> Result<()> {
        let source = build::collect_exact(source, self.len)?;
        self.lazy.fill_with(|| self.map.ident());
        build::build(
            self.len,
            source,
            &mut build::Flat {
                data: &mut self.data,
                op: &self.op,
            },
        );
        Ok(())
    }

    /// 頂点`seg`の作用素を値に作用させ、子の作用素に合成する。
    fn propagate(&mut self, seg: Segment) {
        if self.map.is_ident(&self.lazy[seg.index]) {
            return;
        }
        let f = mem::replace(&mut self.lazy[seg.index], self.map.ident());
        self.data[seg.index] = self
            .map
            .apply(&self.data[seg.index], &f, seg.left, seg.right);
        if !seg.is_leaf() {
            let (l, r) = seg.children();
            self.lazy[l.index] = self.map.composite(&self.lazy[l.index], &f);
            self.lazy[r.index] = self.map.composite(&self.lazy[r.index], &f);
        }
    }

    /// 子の値から頂点の値を計算し直す。子は伝播済みでなければならない。
    fn eval(&mut self, seg: Segment) {
        let (l, r) = seg.children();
        self.data[seg.index] = self.op.op(&self.data[l.index], &self.data[r.index]);
    }

    /// 位置`pos`の値を`value`で置き換える。
    pub fn set(&mut self, pos: usize, value: T) -> Result<()> {
        let root = error::root_for(pos, self.len)?;
        self.set_inner(root, pos, value);
        Ok(())
    }

    fn set_inner(&mut self, seg: Segment, pos: usize, value: T) {
        self.propagate(seg);
        if seg.is_leaf() {
            self.data[seg.index] = value;
            return;
        }
        let (l, r) = seg.children();
        if pos <= l.right {
            self.set_inner(l, pos, value);
            self.propagate(r);
        } else {
            self.propagate(l);
            self.set_inner(r, pos, value);
        }
        self.eval(seg);
    }

    /// 位置`pos`の値に作用素`f`を作用させる。
    pub fn apply(&mut self, pos: usize, f: F) -> Result<()> {
        let root = error::root_for(pos, self.len)?;
        self.update_inner(root, pos, pos, &f);
        Ok(())
    }

    /// 区間に含まれるすべての値に作用素`f`を作用させる。
    ///
    /// 範囲外の部分は無視され、空の区間に対しては何もしない。
    pub fn update<R: RangeBounds<usize>>(&mut self, range: R, f: F) {
        if let (Some(root), Some((l, r))) =
            (Segment::root(self.len), index::inclusive_bounds(range, self.len))
        {
            self.update_inner(root, l, r, &f);
        }
    }

    fn update_inner(&mut self, seg: Segment, l: usize, r: usize, f: &F) {
        self.propagate(seg);
        if seg.is_disjoint(l, r) {
            return;
        }
        if seg.is_covered_by(l, r) {
            self.lazy[seg.index] = self.map.composite(&self.lazy[seg.index], f);
            self.propagate(seg);
            return;
        }
        let (lc, rc) = seg.children();
        self.update_inner(lc, l, r, f);
        self.update_inner(rc, l, r, f);
        self.eval(seg);
    }

    /// 区間に含まれる値を`op`で畳み込んだ値。
    ///
    /// 範囲外の部分は無視され、空の区間に対しては単位元を返す。
    pub fn query<R: RangeBounds<usize>>(&mut self, range: R) -> T
    where
        T: Clone,
    {
        match (Segment::root(self.len), index::inclusive_bounds(range, self.len)) {
            (Some(root), Some((l, r))) => self.query_inner(root, l, r),
            _ => self.op.ident(),
        }
    }

    fn query_inner(&mut self, seg: Segment, l: usize, r: usize) -> T
    where
        T: Clone,
    {
        self.propagate(seg);
        if seg.is_disjoint(l, r) {
            self.op.ident()
        } else if seg.is_covered_by(l, r) {
            self.data[seg.index].clone()
        } else {
            let (lc, rc) = seg.children();
            let left = self.query_inner(lc, l, r);
            let right = self.query_inner(rc, l, r);
            self.op.op(&left, &right)
        }
    }

    pub fn all(&mut self) -> T
    where
        T: Clone,
    {
        self.query(..)
    }

    /// 位置`pos`の値への参照。経路上の作用素はすべて伝播される。
    pub fn get(&mut self, pos: usize) -> Result<&T> {
        let mut seg = error::root_for(pos, self.len)?;
        self.propagate(seg);
        while !seg.is_leaf() {
            seg = seg.child_towards(pos);
            self.propagate(seg);
        }
        Ok(&self.data[seg.index])
    }

    /// すべての作用素を葉まで伝播させる。O(n)。
    fn propagate_all(&mut self) {
        let mut stack = Segment::root(self.len).into_iter().collect::<Vec<_>>();
        while let Some(seg) = stack.pop() {
            self.propagate(seg);
            if !seg.is_leaf() {
                let (l, r) = seg.children();
                stack.push(l);
                stack.push(r);
            }
        }
    }

    /// 作用素をすべて作用させた後の配列を返す。データ数をnとすると、O(n)時間かかることに注意。
    pub fn to_vec(&mut self) -> Vec<T>
    where
        T: Clone,
    {
        self.propagate_all();
        index::leaves(self.len)
            .map(|leaf| self.data[leaf.index].clone())
            .collect()
    }

    /// 作用素をすべて作用させた後、一点更新のセグメント木に戻す。
    pub fn into_segtree(mut self) -> Segtree<T, OP> {
        self.propagate_all();
        let Self { len, data, op, .. } = self;
        Segtree { len, data, op }
    }
}
