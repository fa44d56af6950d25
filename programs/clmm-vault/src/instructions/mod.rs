pub mod close_position;
pub mod collect_fees;
pub mod deposit;
pub mod initialize_vault;
pub mod liquidity;
pub mod open_position;
pub mod update_prices;
pub mod update_ticks;
pub mod withdraw;

pub use close_position::*;
pub use collect_fees::*;
pub use deposit::*;
pub use initialize_vault::*;
pub use liquidity::*;
pub use open_position::*;
pub use update_prices::*;
pub use update_ticks::*;
pub use withdraw::*;
