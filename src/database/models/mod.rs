pub mod business;
pub mod cms;
pub mod cobranding;
pub mod creator;
pub mod marketplace;
pub mod match_score;
pub mod platform;
pub mod profile;

pub use business::{Business, VerificationStatus};
pub use cms::{CmsBlockDefinition, CmsPage, CmsPageVersion, CmsSection, FooterLink, NavigationItem, PageStatus};
pub use cobranding::{
    AgreementStatus, CoBrandingAgreement, CoBrandingIntent, CoBrandingOption, CoBrandingProof,
    IntentStatus, ProofStatus, ProofType,
};
pub use creator::Creator;
pub use marketplace::{Asset, Booking};
pub use match_score::MatchScore;
pub use platform::{AuditLog, EmergencyControls, FeatureFlag, LegalDocument, PlatformSettings};
pub use profile::{Profile, Role};
