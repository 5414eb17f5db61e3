use std::ops::{Add, Sub};

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

/// Cell coordinate (or a step between cells) on the simulation grid.
pub type Pos = Vec2<i32>;

impl<T> Copy for Vec2<T> where T: Copy {}

impl<T> Clone for Vec2<T>
where
    T: Copy,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Vec2<i32> {
    pub const ZERO: Pos = Vec2::new(0, 0);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl<T> Add for Vec2<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> Sub for Vec2<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T> From<[T; 2]> for Vec2<T>
where
    T: Copy,
{
    fn from(array: [T; 2]) -> Self {
        Self {
            x: array[0],
            y: array[1],
        }
    }
}

impl<T> From<Vec2<T>> for [T; 2]
where
    T: Copy,
{
    fn from(v: Vec2<T>) -> Self {
        [v.x, v.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_arithmetic() {
        let p: Pos = [120, 100].into();
        let step = Pos::new(-1, 1);
        assert_eq!(p + step, Pos::new(119, 101));
        assert_eq!((p + step) - p, step);
        assert!((p - p).is_zero());
        let [x, y]: [i32; 2] = p.into();
        assert_eq!((x, y), (120, 100));
    }
}
