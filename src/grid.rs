use std::ops::Add;

/// Integer coordinate on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

/// Neighbor offsets in lookup order. Adjacency results always follow this order,
/// which keeps random choices over neighbor lists reproducible.
pub const ADJACENT_OFFSETS: [Point; 8] = [
    Point::new(-1, -1),
    Point::new(-1, 0),
    Point::new(0, -1),
    Point::new(1, 1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(1, -1),
];

/// Fixed-size rectangular grid (non-wrapping) backed by a flat row-major array
#[derive(Debug, Clone)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid, filling every cell from its coordinate
    pub fn new(width: usize, height: usize, mut fill: impl FnMut(Point) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(fill(Point::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Center of the grid (integer halves)
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Check that `0 <= x < width` and `0 <= y < height`
    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    #[inline]
    fn index(&self, point: Point) -> usize {
        assert!(
            self.in_bounds(point),
            "grid access out of bounds: ({}, {}) on {}x{}",
            point.x,
            point.y,
            self.width,
            self.height
        );
        point.y as usize * self.width + point.x as usize
    }

    /// Direct lookup. Panics when `point` is out of bounds.
    pub fn at(&self, point: Point) -> &T {
        &self.cells[self.index(point)]
    }

    /// Direct mutable lookup. Panics when `point` is out of bounds.
    pub fn at_mut(&mut self, point: Point) -> &mut T {
        let idx = self.index(point);
        &mut self.cells[idx]
    }

    /// In-bounds neighbor coordinates of `point`, in `ADJACENT_OFFSETS` order
    pub fn adjacent_points(&self, point: Point) -> Vec<Point> {
        ADJACENT_OFFSETS
            .iter()
            .map(|&offset| point + offset)
            .filter(|&p| self.in_bounds(p))
            .collect()
    }

    /// In-bounds neighbor cells of `point`, in `ADJACENT_OFFSETS` order.
    /// Out-of-range inputs simply yield fewer (or no) neighbors.
    pub fn possible_adjacent(&self, point: Point) -> Vec<&T> {
        self.adjacent_points(point)
            .into_iter()
            .map(|p| self.at(p))
            .collect()
    }

    /// Every coordinate in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x as i32, y as i32)))
    }

    /// Every cell with its coordinate, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.points().zip(self.cells.iter())
    }

    /// Rows from y = 0 upward
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width.max(1))
    }
}
