pub mod competitor;
pub mod customer;
pub mod order;
pub mod product;
pub mod repository;

pub use competitor::{average_category_price, CompetitorPrice};
pub use customer::CustomerSegment;
pub use order::{units_sold, Order, OrderItem};
pub use product::{PriceChange, Product, ProductError};
pub use repository::{OrderHistory, ProductCatalog};
