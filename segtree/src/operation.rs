use std::{marker::PhantomData, ops};

/// 結合的な二項演算と単位元の組。
///
/// `op`は結合則を満たし、`ident()`はその単位元でなければならない。
/// これは検査されず、満たさない場合は誤った値が返るだけである。
pub trait Operator {
    type Query;
    fn ident(&self) -> Self::Query;
    fn op(&self, a: &Self::Query, b: &Self::Query) -> Self::Query;
}

impl<O: Operator> Operator for &O {
    type Query = O::Query;
    fn ident(&self) -> Self::Query {
        O::ident(self)
    }
    fn op(&self, a: &Self::Query, b: &Self::Query) -> Self::Query {
        O::op(self, a, b)
    }
}

/// 冪等な演算 (`op(a, a) = a`) であることを表す。
pub trait Idempotent: Operator {}

/// 区間に遅延して作用させる作用素。
///
/// * `apply(v, f, l, r)`は長さ`r - l + 1`の区間の集約値`v`に`f`を作用させた値を返す。
/// * `composite(older, newer)`は`older`を作用させた後に`newer`を作用させることに相当する作用素を返す。
/// * `ident()`は`composite`の単位元で、`is_ident`はそれと等しいかを判定する。
pub trait Map {
    type Query;
    type Elem;
    fn ident(&self) -> Self::Elem;
    fn is_ident(&self, f: &Self::Elem) -> bool;
    fn apply(&self, value: &Self::Query, f: &Self::Elem, left: usize, right: usize) -> Self::Query;
    fn composite(&self, older: &Self::Elem, newer: &Self::Elem) -> Self::Elem;
}

pub trait HasZero {
    const ZERO: Self;
}

pub trait HasOne {
    const ONE: Self;
}

pub trait HasMax {
    const MAX: Self;
}

pub trait HasMin {
    const MIN: Self;
}

/// 区間の長さを値の型に変換する。
///
/// 長さが型に収まらない場合はpanicする。
pub trait FromCount {
    fn from_count(count: usize) -> Self;
}

macro_rules! impl_trait_integer {
    ($($t:ty),*) => {
        $(
            impl HasZero for $t {
                const ZERO: Self = 0;
            }
            impl HasOne for $t {
                const ONE: Self = 1;
            }
            impl HasMax for $t {
                const MAX: Self = <$t>::MAX;
            }
            impl HasMin for $t {
                const MIN: Self = <$t>::MIN;
            }
            impl FromCount for $t {
                fn from_count(count: usize) -> Self {
                    <$t>::try_from(count).unwrap_or_else(|_| {
                        panic!("segment length {count} does not fit in {}", stringify!($t))
                    })
                }
            }
        )*
    };
}

impl_trait_integer!(i8, i16, i32, i64, i128, isize);
impl_trait_integer!(u8, u16, u32, u64, u128, usize);

macro_rules! marker_struct {
    ($($name:ident),*) => {
        $(
            pub struct $name<T>(PhantomData<fn() -> T>);

            impl<T> Default for $name<T> {
                fn default() -> Self {
                    Self(PhantomData)
                }
            }

            impl<T> Clone for $name<T> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for $name<T> {}

            impl<T> std::fmt::Debug for $name<T> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )*
    };
}

marker_struct!(Add, Mul, Max, Min, Xor, RangeAddSum, RangeAdd, RangeUpdate);

impl<T> Operator for Add<T>
where
    T: ops::Add<Output = T> + Clone + HasZero,
{
    type Query = T;
    fn ident(&self) -> T {
        T::ZERO
    }
    fn op(&self, a: &T, b: &T) -> T {
        a.clone() + b.clone()
    }
}

impl<T> Operator for Mul<T>
where
    T: ops::Mul<Output = T> + Clone + HasOne,
{
    type Query = T;
    fn ident(&self) -> T {
        T::ONE
    }
    fn op(&self, a: &T, b: &T) -> T {
        a.clone() * b.clone()
    }
}

impl<T> Operator for Xor<T>
where
    T: ops::BitXor<Output = T> + Clone + HasZero,
{
    type Query = T;
    fn ident(&self) -> T {
        T::ZERO
    }
    fn op(&self, a: &T, b: &T) -> T {
        a.clone() ^ b.clone()
    }
}

impl<T> Operator for Max<T>
where
    T: Ord + Clone + HasMin,
{
    type Query = T;
    fn ident(&self) -> T {
        T::MIN
    }
    fn op(&self, a: &T, b: &T) -> T {
        if a > b {
            a.clone()
        } else {
            b.clone()
        }
    }
}

impl<T> Operator for Min<T>
where
    T: Ord + Clone + HasMax,
{
    type Query = T;
    fn ident(&self) -> T {
        T::MAX
    }
    fn op(&self, a: &T, b: &T) -> T {
        if a < b {
            a.clone()
        } else {
            b.clone()
        }
    }
}

impl<T: Ord + Clone + HasMin> Idempotent for Max<T> {}
impl<T: Ord + Clone + HasMax> Idempotent for Min<T> {}

/// 単位元とクロージャから作るモノイド。
#[derive(Debug, Clone, Copy)]
pub struct Monoid<T, F> {
    ident: T,
    op: F,
}

impl<T: Clone, F: Fn(&T, &T) -> T> Operator for Monoid<T, F> {
    type Query = T;
    fn ident(&self) -> T {
        self.ident.clone()
    }
    fn op(&self, a: &T, b: &T) -> T {
        (self.op)(a, b)
    }
}

/// 区間和に対する区間加算。
impl<T> Map for RangeAddSum<T>
where
    T: ops::Add<Output = T> + ops::Mul<Output = T> + Clone + PartialEq + HasZero + FromCount,
{
    type Query = T;
    type Elem = T;
    fn ident(&self) -> T {
        T::ZERO
    }
    fn is_ident(&self, f: &T) -> bool {
        *f == T::ZERO
    }
    fn apply(&self, value: &T, f: &T, left: usize, right: usize) -> T {
        value.clone() + f.clone() * T::from_count(right - left + 1)
    }
    fn composite(&self, older: &T, newer: &T) -> T {
        older.clone() + newer.clone()
    }
}

/// 区間最小値・最大値に対する区間加算。
impl<T> Map for RangeAdd<T>
where
    T: ops::Add<Output = T> + Clone + PartialEq + HasZero,
{
    type Query = T;
    type Elem = T;
    fn ident(&self) -> T {
        T::ZERO
    }
    fn is_ident(&self, f: &T) -> bool {
        *f == T::ZERO
    }
    fn apply(&self, value: &T, f: &T, _left: usize, _right: usize) -> T {
        value.clone() + f.clone()
    }
    fn composite(&self, older: &T, newer: &T) -> T {
        older.clone() + newer.clone()
    }
}

/// 区間最小値・最大値に対する区間代入。新しい作用素が優先される。
impl<T: Clone> Map for RangeUpdate<T> {
    type Query = T;
    type Elem = Option<T>;
    fn ident(&self) -> Option<T> {
        None
    }
    fn is_ident(&self, f: &Option<T>) -> bool {
        f.is_none()
    }
    fn apply(&self, value: &T, f: &Option<T>, _left: usize, _right: usize) -> T {
        f.as_ref().unwrap_or(value).clone()
    }
    fn composite(&self, older: &Option<T>, newer: &Option<T>) -> Option<T> {
        newer.as_ref().or(older.as_ref()).cloned()
    }
}

/// 単位元とクロージャから作る作用素。
#[derive(Debug, Clone, Copy)]
pub struct LazyFn<T, U, A, C> {
    ident: U,
    apply: A,
    composite: C,
    _marker: PhantomData<fn(&T) -> T>,
}

impl<T, U, A, C> Map for LazyFn<T, U, A, C>
where
    U: Clone + PartialEq,
    A: Fn(&T, &U, usize, usize) -> T,
    C: Fn(&U, &U) -> U,
{
    type Query = T;
    type Elem = U;
    fn ident(&self) -> U {
        self.ident.clone()
    }
    fn is_ident(&self, f: &U) -> bool {
        *f == self.ident
    }
    fn apply(&self, value: &T, f: &U, left: usize, right: usize) -> T {
        (self.apply)(value, f, left, right)
    }
    fn composite(&self, older: &U, newer: &U) -> U {
        (self.composite)(older, newer)
    }
}

pub fn add<T>() -> Add<T> {
    Add::default()
}

pub fn mul<T>() -> Mul<T> {
    Mul::default()
}

pub fn xor<T>() -> Xor<T> {
    Xor::default()
}

pub fn max<T>() -> Max<T> {
    Max::default()
}

pub fn min<T>() -> Min<T> {
    Min::default()
}

pub fn monoid<T, F>(ident: T, op: F) -> Monoid<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> T,
{
    Monoid { ident, op }
}

pub fn range_add_sum<T>() -> RangeAddSum<T> {
    RangeAddSum::default()
}

pub fn range_add<T>() -> RangeAdd<T> {
    RangeAdd::default()
}

pub fn update<T>() -> RangeUpdate<T> {
    RangeUpdate::default()
}

pub fn lazy_fn<T, U, A, C>(ident: U, apply: A, composite: C) -> LazyFn<T, U, A, C>
where
    U: Clone + PartialEq,
    A: Fn(&T, &U, usize, usize) -> T,
    C: Fn(&U, &U) -> U,
{
    LazyFn {
        ident,
        apply,
        composite,
        _marker: PhantomData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ident_test() {
        let (add, mul, min, max) = (add::<i64>(), mul::<u32>(), min::<i32>(), max::<u8>());
        assert_eq!(add.op(&add.ident(), &5), 5);
        assert_eq!(mul.op(&7, &mul.ident()), 7);
        assert_eq!(min.op(&min.ident(), &-3), -3);
        assert_eq!(max.op(&max.ident(), &0), 0);
        assert_eq!(xor::<u16>().op(&0b1010, &0b0110), 0b1100);
    }

    #[test]
    fn range_add_sum_apply_test() {
        let map = range_add_sum::<i64>();
        assert_eq!(map.apply(&9, &10, 1, 3), 39);
        assert_eq!(map.composite(&2, &3), 5);
        assert!(map.is_ident(&0));
    }

    #[test]
    fn narrow_count_test() {
        let map = range_add_sum::<i8>();
        assert_eq!(map.apply(&0, &1, 0, 126), 127);
        assert_eq!(u8::from_count(255), 255);
    }

    #[test]
    #[should_panic(expected = "does not fit in i8")]
    fn narrow_count_overflow() {
        range_add_sum::<i8>().apply(&0, &1, 0, 199);
    }

    #[test]
    fn update_composite_prefers_newer() {
        let map = update::<i32>();
        assert_eq!(map.composite(&Some(1), &Some(2)), Some(2));
        assert_eq!(map.composite(&Some(1), &None), Some(1));
        assert_eq!(map.apply(&7, &None, 0, 3), 7);
        assert_eq!(map.apply(&7, &Some(-1), 0, 3), -1);
    }

    #[test]
    fn closure_monoid_test() {
        let gcd = monoid(0u64, |&a: &u64, &b: &u64| {
            let (mut a, mut b) = (a, b);
            while b != 0 {
                (a, b) = (b, a % b);
            }
            a
        });
        assert_eq!(gcd.op(&12, &18), 6);
        assert_eq!(gcd.op(&gcd.ident(), &18), 18);
    }
}
