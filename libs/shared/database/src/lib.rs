pub mod query;
pub mod supabase;

pub use query::{Order, SelectQuery};
pub use supabase::SupabaseClient;
