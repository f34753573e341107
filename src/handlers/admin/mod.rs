pub mod cms;
pub mod flags;
pub mod site;
pub mod users;
pub mod verification;
