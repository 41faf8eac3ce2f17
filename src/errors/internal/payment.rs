use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    PaymentNotFound(i32),

    #[error("Payment {0} belongs to another user")]
    NotPaymentOwner(i32),
}
