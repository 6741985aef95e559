pub mod onboarding;
pub mod onboarding_impl;
pub use onboarding::{OnboardingService, RegisterError, RegistrationRequest};
pub use onboarding_impl::DefaultOnboardingService;

pub mod account;
pub mod account_impl;
pub use account::{AccountError, AccountService, LoginSummary, ProfileReport};
pub use account_impl::SeaOrmAccountService;
