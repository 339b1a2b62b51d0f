pub mod favorites;
pub mod providers;
pub mod recommendations;
pub mod trends;
pub mod users;

pub use favorites::FavoritesService;
pub use recommendations::RecommendationService;
pub use trends::{TrendAnalysisService, TrendQuery};
pub use users::UsersService;
