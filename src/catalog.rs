//! Game catalog
//!
//! Static listing shown by the host shell. Only nine entries have a real
//! simulation; every other id resolves through its category (see
//! [`crate::games::resolve`]).

use serde::Serialize;

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Arcade,
    Puzzle,
    Adventure,
    Sports,
    Racing,
    Fighting,
    Strategy,
    Shooter,
    Card,
    Platformer,
    Rhythm,
    Simulation,
    Classic,
    Casual,
    Bonus,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Arcade => "Arcade",
            Category::Puzzle => "Puzzle",
            Category::Adventure => "Adventure",
            Category::Sports => "Sports",
            Category::Racing => "Racing",
            Category::Fighting => "Fighting",
            Category::Strategy => "Strategy",
            Category::Shooter => "Shooter",
            Category::Card => "Card",
            Category::Platformer => "Platformer",
            Category::Rhythm => "Rhythm",
            Category::Simulation => "Simulation",
            Category::Classic => "Classic",
            Category::Casual => "Casual",
            Category::Bonus => "Bonus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub category: Category,
}

impl CatalogEntry {
    const fn new(id: &'static str, title: &'static str, category: Category) -> Self {
        Self { id, title, category }
    }
}

pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry::new("snake", "Snake Classic", Category::Arcade),
    CatalogEntry::new("pong", "Pong Battle", Category::Arcade),
    CatalogEntry::new("breakout", "Brick Breaker", Category::Arcade),
    CatalogEntry::new("space", "Space Invaders", Category::Arcade),
    CatalogEntry::new("pacman", "Pac-Maze", Category::Arcade),
    CatalogEntry::new("asteroids", "Asteroids", Category::Arcade),
    CatalogEntry::new("galaga", "Galaxy War", Category::Arcade),
    CatalogEntry::new("digdug", "Dig Master", Category::Arcade),
    CatalogEntry::new("tetris", "Block Fall", Category::Puzzle),
    CatalogEntry::new("2048", "2048 Pro", Category::Puzzle),
    CatalogEntry::new("minesweeper", "Mine Hunter", Category::Puzzle),
    CatalogEntry::new("sudoku", "Sudoku Master", Category::Puzzle),
    CatalogEntry::new("rubik", "Cube Solver", Category::Puzzle),
    CatalogEntry::new("mahjong", "Tile Match", Category::Puzzle),
    CatalogEntry::new("sokoban", "Box Pusher", Category::Puzzle),
    CatalogEntry::new("crossword", "Word Cross", Category::Puzzle),
    CatalogEntry::new("zelda", "Legend Quest", Category::Adventure),
    CatalogEntry::new("mario", "Platform Hero", Category::Adventure),
    CatalogEntry::new("sonic", "Speed Runner", Category::Adventure),
    CatalogEntry::new("metroid", "Space Explorer", Category::Adventure),
    CatalogEntry::new("castlevania", "Castle Quest", Category::Adventure),
    CatalogEntry::new("megaman", "Robo Fighter", Category::Adventure),
    CatalogEntry::new("tennis", "Court Champion", Category::Sports),
    CatalogEntry::new("basketball", "Hoop Dreams", Category::Sports),
    CatalogEntry::new("soccer", "Goal Master", Category::Sports),
    CatalogEntry::new("bowling", "Strike King", Category::Sports),
    CatalogEntry::new("golf", "Mini Golf Pro", Category::Sports),
    CatalogEntry::new("baseball", "Home Run Hero", Category::Sports),
    CatalogEntry::new("racing1", "Speed Racer", Category::Racing),
    CatalogEntry::new("racing2", "Drift Master", Category::Racing),
    CatalogEntry::new("racing3", "Kart Racing", Category::Racing),
    CatalogEntry::new("racing4", "Moto GP", Category::Racing),
    CatalogEntry::new("racing5", "Rally Challenge", Category::Racing),
    CatalogEntry::new("fight1", "Street Brawl", Category::Fighting),
    CatalogEntry::new("fight2", "Ninja Combat", Category::Fighting),
    CatalogEntry::new("fight3", "Monster Clash", Category::Fighting),
    CatalogEntry::new("fight4", "Samurai Duel", Category::Fighting),
    CatalogEntry::new("chess", "Chess Master", Category::Strategy),
    CatalogEntry::new("checkers", "Checkers Pro", Category::Strategy),
    CatalogEntry::new("tower", "Tower Defense", Category::Strategy),
    CatalogEntry::new("war", "Battle Commander", Category::Strategy),
    CatalogEntry::new("civilization", "Empire Builder", Category::Strategy),
    CatalogEntry::new("duck", "Duck Hunt", Category::Shooter),
    CatalogEntry::new("zombies", "Zombie Shooter", Category::Shooter),
    CatalogEntry::new("laser", "Laser Strike", Category::Shooter),
    CatalogEntry::new("cannon", "Cannon Blaster", Category::Shooter),
    CatalogEntry::new("poker", "Poker Night", Category::Card),
    CatalogEntry::new("blackjack", "21 Blackjack", Category::Card),
    CatalogEntry::new("solitaire", "Solitaire Gold", Category::Card),
    CatalogEntry::new("uno", "Uno Master", Category::Card),
    CatalogEntry::new("platform1", "Jump Quest", Category::Platformer),
    CatalogEntry::new("platform2", "Pixel Runner", Category::Platformer),
    CatalogEntry::new("platform3", "Cave Explorer", Category::Platformer),
    CatalogEntry::new("platform4", "Sky Jumper", Category::Platformer),
    CatalogEntry::new("rhythm1", "Beat Master", Category::Rhythm),
    CatalogEntry::new("rhythm2", "Dance Dance", Category::Rhythm),
    CatalogEntry::new("rhythm3", "Guitar Hero", Category::Rhythm),
    CatalogEntry::new("rhythm4", "Piano Tiles", Category::Rhythm),
    CatalogEntry::new("sim1", "Farm Life", Category::Simulation),
    CatalogEntry::new("sim2", "City Builder", Category::Simulation),
    CatalogEntry::new("sim3", "Restaurant Tycoon", Category::Simulation),
    CatalogEntry::new("sim4", "Zoo Manager", Category::Simulation),
    CatalogEntry::new("retro1", "Frogger", Category::Classic),
    CatalogEntry::new("retro2", "Q*bert", Category::Classic),
    CatalogEntry::new("retro3", "Donkey Kong", Category::Classic),
    CatalogEntry::new("retro4", "Centipede", Category::Classic),
    CatalogEntry::new("retro5", "Joust", Category::Classic),
    CatalogEntry::new("casual1", "Bubble Pop", Category::Casual),
    CatalogEntry::new("casual2", "Match 3 Mania", Category::Casual),
    CatalogEntry::new("casual3", "Word Search", Category::Casual),
    CatalogEntry::new("casual4", "Color Switch", Category::Casual),
    CatalogEntry::new("casual5", "Jigsaw Puzzle", Category::Casual),
    CatalogEntry::new("bonus1", "Coin Master", Category::Bonus),
    CatalogEntry::new("bonus2", "Lucky Spin", Category::Bonus),
    CatalogEntry::new("bonus3", "Treasure Hunt", Category::Bonus),
    CatalogEntry::new("bonus4", "Mystery Box", Category::Bonus),
    CatalogEntry::new("bonus5", "Daily Challenge", Category::Bonus),
    CatalogEntry::new("flappy", "Flappy Flight", Category::Casual),
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("snake").map(|e| e.category), Some(Category::Arcade));
        assert_eq!(find("2048").map(|e| e.title), Some("2048 Pro"));
        assert!(find("no-such-game").is_none());
    }

    #[test]
    fn test_shooter_count() {
        let shooters = CATALOG
            .iter()
            .filter(|e| e.category == Category::Shooter)
            .count();
        assert_eq!(shooters, 4);
    }
}
