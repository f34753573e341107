pub mod cobranding;
pub mod discover;
pub mod marketplace;
pub mod onboarding;
pub mod session;
