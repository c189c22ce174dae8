mod chaos_game;

pub use chaos_game::ChaosGame;
