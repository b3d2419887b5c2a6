//! Checkout form validation.
//!
//! A pure predicate over the delivery and payment fields. Failures come back
//! as [`ValidationError`] values for the UI to display; nothing here panics or
//! touches storage.

use crate::{errors::ValidationError, models::PaymentMethod};
use tracing::debug;

/// Who receives the order and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryInfo {
    /// Recipient name
    pub name: String,
    /// Delivery address
    pub address: String,
}

impl DeliveryInfo {
    /// Delivery details from a name and address.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Raw payment form fields. Only the ones relevant to the selected method are
/// checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Card number, for card payments
    pub card_number: String,
    /// Card expiry, for card payments
    pub expiry_date: String,
    /// Card security code, for card payments
    pub cvv: String,
    /// UPI id, for UPI payments
    pub upi_id: String,
}

/// Selected payment method together with its form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    /// Method selected on the form
    pub method: PaymentMethod,
    /// Fields entered for it
    pub details: PaymentDetails,
}

impl PaymentInfo {
    /// Cash on delivery needs no extra fields.
    #[must_use]
    pub fn cash_on_delivery() -> Self {
        Self {
            method: PaymentMethod::CashOnDelivery,
            details: PaymentDetails::default(),
        }
    }

    /// Card payment with the given card fields.
    #[must_use]
    pub fn card(
        method: PaymentMethod,
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            method,
            details: PaymentDetails {
                card_number: card_number.into(),
                expiry_date: expiry_date.into(),
                cvv: cvv.into(),
                ..PaymentDetails::default()
            },
        }
    }

    /// UPI payment with the given UPI id.
    #[must_use]
    pub fn upi(upi_id: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Upi,
            details: PaymentDetails {
                upi_id: upi_id.into(),
                ..PaymentDetails::default()
            },
        }
    }
}

/// Checks delivery info and the fields required by `method`.
///
/// # Errors
/// - [`ValidationError::MissingDeliveryInfo`] if name or address is empty
/// - [`ValidationError::IncompletePaymentDetails`] if a card field (card
///   methods) or the UPI id (UPI) is empty
pub fn validate(
    delivery: &DeliveryInfo,
    method: PaymentMethod,
    details: &PaymentDetails,
) -> Result<(), ValidationError> {
    if delivery.name.is_empty() || delivery.address.is_empty() {
        debug!("Validation failed: name or address is empty");
        return Err(ValidationError::MissingDeliveryInfo);
    }

    let complete = match method {
        PaymentMethod::CreditCard | PaymentMethod::DebitCard => {
            !details.card_number.is_empty()
                && !details.expiry_date.is_empty()
                && !details.cvv.is_empty()
        }
        PaymentMethod::Upi => !details.upi_id.is_empty(),
        PaymentMethod::CashOnDelivery => true,
    };
    debug!(
        "Payment validation for {}: {}",
        method,
        if complete { "valid" } else { "invalid" }
    );

    if complete {
        Ok(())
    } else {
        Err(ValidationError::IncompletePaymentDetails)
    }
}

/// Same as [`validate`] but takes the payment method as its display label,
/// the way a picker hands it over.
///
/// # Errors
/// Everything [`validate`] reports, plus
/// [`ValidationError::UnknownPaymentMethod`] when `method_label` matches no
/// supported method. Delivery info is checked first.
pub fn validate_labelled(
    delivery: &DeliveryInfo,
    method_label: &str,
    details: &PaymentDetails,
) -> Result<PaymentMethod, ValidationError> {
    if delivery.name.is_empty() || delivery.address.is_empty() {
        return Err(ValidationError::MissingDeliveryInfo);
    }
    let method: PaymentMethod = method_label.parse()?;
    validate(delivery, method, details)?;
    Ok(method)
}
