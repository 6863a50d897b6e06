pub mod bus;
pub mod provider;
pub mod session;
pub mod webhook;

pub use bus::{EventBus, RedisBus};
pub use provider::{CheckoutSession, PaymentProvider, StripeClient};
pub use session::SessionService;
pub use webhook::{DispatchError, DispatchOutcome, WebhookDispatcher};
