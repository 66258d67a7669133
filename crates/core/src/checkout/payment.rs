//! Payment-method selection validation.

use std::collections::HashMap;

use super::error::CheckoutError;
use crate::types::{Artisan, ArtisanId, PaymentMethod};

/// Validate the buyer's per-artisan payment selections before submission.
///
/// Every artisan in the cart needs exactly one selected method, and it must
/// be one the artisan accepts. There is no default: an artisan with a
/// single accepted method still requires an explicit selection.
///
/// # Errors
///
/// [`CheckoutError::IncompleteSelection`] for a missing selection,
/// [`CheckoutError::UnsupportedPaymentMethod`] for a method outside the
/// artisan's accepted set.
pub fn validate_selections(
    cart_artisans: &[Artisan],
    selections: &HashMap<ArtisanId, PaymentMethod>,
) -> Result<(), CheckoutError> {
    for artisan in cart_artisans {
        match selections.get(&artisan.id) {
            None => {
                return Err(CheckoutError::IncompleteSelection {
                    artisan: artisan.display_name.clone(),
                });
            }
            Some(&method) if !artisan.accepts(method) => {
                return Err(CheckoutError::UnsupportedPaymentMethod {
                    artisan: artisan.display_name.clone(),
                    method,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ShippingZone;

    fn artisan(id: i32, name: &str, methods: Vec<PaymentMethod>) -> Artisan {
        Artisan {
            id: ArtisanId::new(id),
            display_name: name.to_owned(),
            colony: "Centro".to_owned(),
            municipality: "Oaxaca de Juárez".to_owned(),
            state: "Oaxaca".to_owned(),
            shipping_zone: ShippingZone::StateWide,
            payment_methods: methods,
            shipping_policy: String::new(),
        }
    }

    #[test]
    fn test_complete_valid_selection() {
        let artisans = vec![
            artisan(1, "María", vec![PaymentMethod::Cash, PaymentMethod::Card]),
            artisan(2, "Juan", vec![PaymentMethod::Cash]),
        ];
        let selections = HashMap::from([
            (ArtisanId::new(1), PaymentMethod::Card),
            (ArtisanId::new(2), PaymentMethod::Cash),
        ]);
        assert!(validate_selections(&artisans, &selections).is_ok());
    }

    #[test]
    fn test_missing_selection_names_artisan() {
        let artisans = vec![
            artisan(1, "María", vec![PaymentMethod::Cash]),
            artisan(2, "Juan", vec![PaymentMethod::Cash]),
        ];
        let selections = HashMap::from([(ArtisanId::new(1), PaymentMethod::Cash)]);
        assert_eq!(
            validate_selections(&artisans, &selections),
            Err(CheckoutError::IncompleteSelection {
                artisan: "Juan".to_owned()
            })
        );
    }

    #[test]
    fn test_unaccepted_method_is_rejected() {
        let artisans = vec![artisan(1, "Juan", vec![PaymentMethod::Cash])];
        let selections = HashMap::from([(ArtisanId::new(1), PaymentMethod::Card)]);
        assert_eq!(
            validate_selections(&artisans, &selections),
            Err(CheckoutError::UnsupportedPaymentMethod {
                artisan: "Juan".to_owned(),
                method: PaymentMethod::Card,
            })
        );
    }

    #[test]
    fn test_extra_selections_are_ignored() {
        // A leftover selection for an artisan no longer in the cart is not
        // an error; only the cart's artisans are validated.
        let artisans = vec![artisan(1, "María", vec![PaymentMethod::Cash])];
        let selections = HashMap::from([
            (ArtisanId::new(1), PaymentMethod::Cash),
            (ArtisanId::new(9), PaymentMethod::Card),
        ]);
        assert!(validate_selections(&artisans, &selections).is_ok());
    }
}
