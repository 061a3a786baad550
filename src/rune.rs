//! Private rune grid owned by each mob, and the genome interpreter that paints it.

use crate::gene::Gene;
use crate::grid::{Grid, Point};

/// Color tag painted on one rune grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rune {
    #[default]
    None,
    Red,
    Black,
    Green,
    Blue,
}

impl Rune {
    /// Rune painted by a color gene
    pub fn from_gene(gene: Gene) -> Option<Self> {
        match gene {
            Gene::Red => Some(Rune::Red),
            Gene::Black => Some(Rune::Black),
            Gene::Green => Some(Rune::Green),
            Gene::Blue => Some(Rune::Blue),
            _ => None,
        }
    }

    /// Display character (blank for unpainted cells)
    pub fn to_char(self) -> char {
        match self {
            Rune::None => ' ',
            Rune::Red => 'E',
            Rune::Black => 'K',
            Rune::Green => 'G',
            Rune::Blue => 'B',
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Rune::None => 0,
            Rune::Red => 1,
            Rune::Black => 2,
            Rune::Green => 3,
            Rune::Blue => 4,
        }
    }
}

/// Small fixed-size grid of runes, separate from the world grid
#[derive(Debug, Clone)]
pub struct RuneGrid {
    grid: Grid<Rune>,
}

impl RuneGrid {
    /// Blank grid, every cell `Rune::None`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height, |_| Rune::None),
        }
    }

    /// Blank grid painted by running `genome` through the interpreter
    pub fn from_genome(width: usize, height: usize, genome: &[Gene]) -> Self {
        let mut runes = Self::new(width, height);
        runes.run_genes(genome);
        runes
    }

    /// Walk the genome left to right from the grid center.
    /// Moves that would leave the grid are ignored; color genes overwrite the
    /// rune under the cursor. Returns the final cursor position.
    pub fn run_genes(&mut self, genome: &[Gene]) -> Point {
        let mut cursor = self.grid.center();

        for &gene in genome {
            if let Some(step) = gene.step() {
                let next = cursor + step;
                if self.grid.in_bounds(next) {
                    cursor = next;
                }
            } else if let Some(rune) = Rune::from_gene(gene) {
                *self.grid.at_mut(cursor) = rune;
            }
        }

        cursor
    }

    pub fn at(&self, point: Point) -> Rune {
        *self.grid.at(point)
    }

    pub fn grid(&self) -> &Grid<Rune> {
        &self.grid
    }

    /// Number of painted (non-`None`) cells
    pub fn painted_count(&self) -> usize {
        self.grid.iter().filter(|(_, rune)| **rune != Rune::None).count()
    }

    /// One string per row, for a stats display
    pub fn render_rows(&self) -> Vec<String> {
        self.grid
            .rows()
            .map(|row| row.iter().map(|r| r.to_char()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::parse_genome;

    fn run(genome: &str) -> (RuneGrid, Point) {
        let mut runes = RuneGrid::new(30, 10);
        let cursor = runes.run_genes(&parse_genome(genome).unwrap());
        (runes, cursor)
    }

    #[test]
    fn test_blank_grid() {
        let runes = RuneGrid::new(30, 10);
        assert_eq!(runes.painted_count(), 0);
        assert_eq!(runes.at(Point::new(0, 0)), Rune::None);
    }

    #[test]
    fn test_cursor_starts_at_center() {
        let (runes, cursor) = run("K");
        assert_eq!(cursor, Point::new(15, 5));
        assert_eq!(runes.at(Point::new(15, 5)), Rune::Black);
        assert_eq!(runes.painted_count(), 1);
    }

    #[test]
    fn test_moves_follow_gene_steps() {
        let (runes, cursor) = run("UEURB");
        assert_eq!(cursor, Point::new(17, 6));
        assert_eq!(runes.at(Point::new(16, 5)), Rune::Red);
        assert_eq!(runes.at(Point::new(17, 6)), Rune::Blue);
    }

    #[test]
    fn test_paint_overwrites() {
        let (runes, _) = run("EKG");
        assert_eq!(runes.at(Point::new(15, 5)), Rune::Green);
        assert_eq!(runes.painted_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_moves_are_ignored() {
        // Height 10 from y = 5: four RIGHT moves reach the edge, the rest stall
        let (runes, cursor) = run("RRRRRRRRE");
        assert_eq!(cursor, Point::new(15, 9));
        assert_eq!(runes.at(Point::new(15, 9)), Rune::Red);

        let (_, cursor) = run("LLLLLLLLLL");
        assert_eq!(cursor, Point::new(15, 0));
    }

    #[test]
    fn test_moves_only_paint_nothing() {
        let (runes, _) = run("UDLRUDLR");
        assert_eq!(runes.painted_count(), 0);
    }

    #[test]
    fn test_rune_from_gene() {
        assert_eq!(Rune::from_gene(Gene::Red), Some(Rune::Red));
        assert_eq!(Rune::from_gene(Gene::Up), None);
    }

    #[test]
    fn test_render_rows() {
        let runes = RuneGrid::from_genome(3, 3, &parse_genome("G").unwrap());
        let rows = runes.render_rows();
        assert_eq!(rows, vec!["   ".to_string(), " G ".to_string(), "   ".to_string()]);
    }
}
