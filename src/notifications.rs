//! Notifications
//!
//! Every successful cart mutation tells the user what happened. The store hands a
//! [`Notification`] to a [`NotificationSink`] instead of blocking on a dialog.

use std::fmt;

use tracing::info;

/// User-facing event raised after a cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A product was added from the catalog.
    Added {
        /// Product name
        product: String,
        /// Units in the cart afterwards
        count: u32,
    },

    /// One unit was added to a line from the cart screen.
    Increased {
        /// Product name
        product: String,
        /// Units in the cart afterwards
        count: u32,
    },

    /// One unit was taken off a line.
    Decreased {
        /// Product name
        product: String,
        /// Units in the cart afterwards
        count: u32,
    },

    /// A line left the cart.
    Removed {
        /// Product name
        product: String,
    },

    /// Every line left the cart.
    Cleared,

    /// The total was handed off for payment.
    CheckedOut {
        /// Formatted total
        total: String,
        /// Where payment continues
        payment_url: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Added { product, .. } => write!(f, "{product} added to cart!"),
            Notification::Increased { product, .. } => {
                write!(f, "Quantity of {product} increased in cart!")
            }
            Notification::Decreased { product, .. } => {
                write!(f, "Quantity of {product} decreased in cart!")
            }
            Notification::Removed { product } => write!(f, "{product} removed from cart!"),
            Notification::Cleared => write!(f, "Cart emptied!"),
            Notification::CheckedOut { total, payment_url } => {
                write!(f, "Pay {total} at {payment_url}")
            }
        }
    }
}

/// Receives notifications raised by the store.
pub trait NotificationSink {
    /// Deliver one notification.
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in memory.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Delivers every notification to both sinks.
impl<A: NotificationSink, B: NotificationSink> NotificationSink for (A, B) {
    fn notify(&mut self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}

/// Emits each notification as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: Notification) {
        info!(?notification, "{notification}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_product() {
        let added = Notification::Added {
            product: "Apples".to_string(),
            count: 1,
        };
        let removed = Notification::Removed {
            product: "Apples".to_string(),
        };

        assert_eq!(added.to_string(), "Apples added to cart!");
        assert_eq!(removed.to_string(), "Apples removed from cart!");
    }

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<Notification> = Vec::new();

        sink.notify(Notification::Cleared);
        sink.notify(Notification::Removed {
            product: "Bread".to_string(),
        });

        assert_eq!(
            sink,
            [
                Notification::Cleared,
                Notification::Removed {
                    product: "Bread".to_string()
                }
            ]
        );
    }

    #[test]
    fn pair_sink_delivers_to_both() {
        let mut sink: (Vec<Notification>, Vec<Notification>) = (Vec::new(), Vec::new());

        sink.notify(Notification::Cleared);

        assert_eq!(sink.0, [Notification::Cleared]);
        assert_eq!(sink.1, [Notification::Cleared]);
    }

    #[test]
    fn log_sink_accepts_notifications() {
        let mut sink: (LogSink, Vec<Notification>) = (LogSink, Vec::new());

        sink.notify(Notification::Cleared);

        assert_eq!(sink.1, [Notification::Cleared]);
    }
}
