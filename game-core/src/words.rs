use rand::seq::SliceRandom;
use rand::RngCore;

use crate::settings::Difficulty;

pub trait WordProvider {
    fn words_for(&self, difficulty: Difficulty) -> &[&'static str];

    fn draw(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> String {
        self.words_for(difficulty)
            .choose(rng)
            .map(|w| w.to_string())
            .unwrap_or_default()
    }
}

const EASY: &[&str] = &[
    "Apple", "Dog", "Cat", "Tree", "Ball", "Sun", "Moon", "Water", "Fire", "House", "Car", "Book",
    "Phone", "Chair", "Table", "Door", "Window", "Flower", "Bird", "Fish", "Horse", "Cake",
    "Pizza", "Bread", "Milk", "Coffee", "Tea", "Rice", "Egg", "Cheese", "Orange", "Banana",
    "Shirt", "Pants", "Shoes", "Hat", "Rain", "Snow", "Cloud", "Star",
];

const MEDIUM: &[&str] = &[
    "Doctor", "Teacher", "Engineer", "Artist", "Chef", "Pilot", "Lawyer", "Musician", "Architect",
    "Journalist", "Scientist", "Dentist", "Carpenter", "Plumber", "Electrician", "Mechanic",
    "Librarian", "Photographer", "Painter", "Sculptor", "Hammer", "Screwdriver", "Wrench", "Saw",
    "Drill", "Ladder", "Microscope", "Telescope", "Calculator", "Keyboard", "Monitor", "Printer",
    "Scanner", "Refrigerator", "Microwave", "Dishwasher", "Vacuum", "Iron", "Blender", "Toaster",
    "Camera", "Guitar", "Piano", "Violin",
];

const HARD: &[&str] = &[
    "Democracy", "Justice", "Freedom", "Courage", "Wisdom", "Patience", "Ambition", "Nostalgia",
    "Serendipity", "Melancholy", "Euphoria", "Paradox", "Irony", "Metaphor", "Symbolism",
    "Abstract", "Concrete", "Hypothesis", "Theory", "Philosophy", "Psychology", "Sociology",
    "Anthropology", "Archaeology", "Astronomy", "Geology", "Biology", "Chemistry", "Physics",
    "Mathematics", "Algorithm", "Fractal", "Quantum", "Relativity", "Entropy", "Catalyst",
    "Synthesis", "Analysis", "Dialectic", "Dichotomy", "Juxtaposition", "Ambiguity", "Conundrum",
    "Enigma", "Labyrinth",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct WordBank;

impl WordProvider for WordBank {
    fn words_for(&self, difficulty: Difficulty) -> &[&'static str] {
        match difficulty {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }
}
