use std::ops::{Bound, RangeBounds};

/// 区間`[left, right]`を担当する頂点と、その頂点の配列上の位置。
///
/// 子は`children`で求める。左の部分木は`index + 1`から始まる連続した
/// `2 * (mid - left + 1) - 1`個の位置を占めるので、長さが2冪でなくても
/// 長さ`n`の木全体がちょうど`2n - 1`個の位置に詰め込まれる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub index: usize,
    pub left: usize,
    pub right: usize,
}

impl Segment {
    pub const fn root(len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self {
                index: 0,
                left: 0,
                right: len - 1,
            })
        }
    }

    pub const fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    pub const fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub const fn mid(&self) -> usize {
        self.left + (self.right - self.left) / 2
    }

    pub const fn children(&self) -> (Self, Self) {
        let mid = self.mid();
        let left = Self {
            index: self.index + 1,
            left: self.left,
            right: mid,
        };
        let right = Self {
            index: self.index + 2 * (mid - self.left + 1),
            left: mid + 1,
            right: self.right,
        };
        (left, right)
    }

    /// `pos`を含む方の子。葉に対して呼んではいけない。
    pub const fn child_towards(&self, pos: usize) -> Self {
        let (left, right) = self.children();
        if pos <= left.right {
            left
        } else {
            right
        }
    }

    pub const fn contains(&self, pos: usize) -> bool {
        self.left <= pos && pos <= self.right
    }

    pub const fn is_disjoint(&self, l: usize, r: usize) -> bool {
        r < self.left || self.right < l
    }

    pub const fn is_covered_by(&self, l: usize, r: usize) -> bool {
        l <= self.left && self.right <= r
    }

    pub const fn span(&self) -> Span {
        Span {
            left: self.left,
            right: self.right,
        }
    }

    /// 根から`pos`の葉までを辿り、その葉を返す。
    pub fn leaf_of(mut self, pos: usize) -> Self {
        debug_assert!(self.contains(pos));
        while !self.is_leaf() {
            self = self.child_towards(pos);
        }
        self
    }
}

/// 配列上の位置を持たない区間`[left, right]`。
///
/// 頂点を配列に置かない木で使う。位置を計算しないので、`len`が`usize::MAX`でも溢れない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub left: usize,
    pub right: usize,
}

impl Span {
    pub const fn root(len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self {
                left: 0,
                right: len - 1,
            })
        }
    }

    pub const fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    pub const fn mid(&self) -> usize {
        self.left + (self.right - self.left) / 2
    }

    pub const fn children(&self) -> (Self, Self) {
        let mid = self.mid();
        (
            Self {
                left: self.left,
                right: mid,
            },
            Self {
                left: mid + 1,
                right: self.right,
            },
        )
    }

    pub const fn is_disjoint(&self, l: usize, r: usize) -> bool {
        r < self.left || self.right < l
    }

    pub const fn is_covered_by(&self, l: usize, r: usize) -> bool {
        l <= self.left && self.right <= r
    }
}

/// 長さ`len`の木が占める配列の長さ。
pub const fn storage_len(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        2 * len - 1
    }
}

/// 葉を左から順に列挙する。配列上の位置も昇順になる。
pub fn leaves(len: usize) -> Leaves {
    Leaves {
        stack: Segment::root(len).into_iter().collect(),
    }
}

#[derive(Debug, Clone)]
pub struct Leaves {
    stack: Vec<Segment>,
}

impl Iterator for Leaves {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            let seg = self.stack.pop()?;
            if seg.is_leaf() {
                return Some(seg);
            }
            let (left, right) = seg.children();
            self.stack.push(right);
            self.stack.push(left);
        }
    }
}

/// 区間を長さ`len`に切り詰めた閉区間`(l, r)`に変換する。空なら`None`。
///
/// 範囲外や空の区間はエラーではなく、単位元を返すクエリとして扱う。
pub(crate) fn inclusive_bounds<R: RangeBounds<usize>>(range: R, len: usize) -> Option<(usize, usize)> {
    use Bound::*;
    let l = match range.start_bound() {
        Included(&s) => s,
        Excluded(&s) => s.checked_add(1)?,
        Unbounded => 0,
    };
    let r = match range.end_bound() {
        Included(&e) => e,
        Excluded(&e) => e.checked_sub(1)?,
        Unbounded => len.checked_sub(1)?,
    };
    let r = r.min(len.checked_sub(1)?);
    if l > r {
        None
    } else {
        Some((l, r))
    }
}
