use crate::grid::Point;
use rand::Rng;

/// Mob gene alphabet - four cursor moves and four rune colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gene {
    Up,
    Down,
    Left,
    Right,
    Red,
    Black,
    Green,
    Blue,
}

/// Every gene, in draw order for random selection
pub const ALL_GENES: [Gene; 8] = [
    Gene::Up,
    Gene::Down,
    Gene::Left,
    Gene::Right,
    Gene::Red,
    Gene::Black,
    Gene::Green,
    Gene::Blue,
];

impl Gene {
    /// Convert a character to a gene
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Gene::Up),
            'D' => Some(Gene::Down),
            'L' => Some(Gene::Left),
            'R' => Some(Gene::Right),
            'E' => Some(Gene::Red),
            'K' => Some(Gene::Black),
            'G' => Some(Gene::Green),
            'B' => Some(Gene::Blue),
            _ => None,
        }
    }

    /// Convert a gene to its character representation
    pub fn to_char(self) -> char {
        match self {
            Gene::Up => 'U',
            Gene::Down => 'D',
            Gene::Left => 'L',
            Gene::Right => 'R',
            Gene::Red => 'E',
            Gene::Black => 'K',
            Gene::Green => 'G',
            Gene::Blue => 'B',
        }
    }

    /// Cursor offset for a directional gene.
    /// UP/DOWN step along x and LEFT/RIGHT along y on the rune grid.
    pub fn step(self) -> Option<Point> {
        match self {
            Gene::Up => Some(Point::new(1, 0)),
            Gene::Down => Some(Point::new(-1, 0)),
            Gene::Left => Some(Point::new(0, -1)),
            Gene::Right => Some(Point::new(0, 1)),
            _ => None,
        }
    }

    pub fn is_move(self) -> bool {
        self.step().is_some()
    }

    /// Draw one gene uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ALL_GENES[rng.gen_range(0..ALL_GENES.len())]
    }
}

/// Parse a genome string into a vector of genes
pub fn parse_genome(s: &str) -> Result<Vec<Gene>, String> {
    s.chars()
        .map(|c| Gene::from_char(c).ok_or_else(|| format!("Invalid gene character: '{}'", c)))
        .collect()
}

/// Convert a genome back to a string
pub fn genome_to_string(genome: &[Gene]) -> String {
    genome.iter().map(|g| g.to_char()).collect()
}

/// Fresh genome of `length` uniformly drawn genes
pub fn random_genome<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<Gene> {
    (0..length).map(|_| Gene::random(rng)).collect()
}

/// Single genome edit applied when a child inherits a genome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Substitute { position: usize, gene: Gene },
    Insert { position: usize, gene: Gene },
    Delete { position: usize },
    /// Deletion refused because it would leave the genome empty
    Skipped,
}

/// Copy `parent` and apply exactly one uniformly chosen edit.
/// Draw order: edit kind, position, then gene when the edit needs one.
pub fn mutate<R: Rng + ?Sized>(parent: &[Gene], rng: &mut R) -> (Vec<Gene>, Mutation) {
    assert!(!parent.is_empty(), "cannot mutate an empty genome");
    let mut genome = parent.to_vec();

    let mutation = match rng.gen_range(0..3) {
        0 => {
            let position = rng.gen_range(0..genome.len());
            let gene = Gene::random(rng);
            genome[position] = gene;
            Mutation::Substitute { position, gene }
        }
        1 => {
            let position = rng.gen_range(0..genome.len());
            let gene = Gene::random(rng);
            genome.insert(position, gene);
            Mutation::Insert { position, gene }
        }
        _ => {
            if genome.len() > 1 {
                let position = rng.gen_range(0..genome.len());
                genome.remove(position);
                Mutation::Delete { position }
            } else {
                Mutation::Skipped
            }
        }
    };

    (genome, mutation)
}
