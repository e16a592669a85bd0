//! # Checkout Message
//!
//! Renders the cart as a human-readable order summary and encodes it for a
//! messaging deep link.
//!
//! ## Message Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ¡Hola! Quisiera realizar el siguiente pedido en KoiShop:   ← greeting │
//! │                                                                         │
//! │  • A (2x) - $10.00                                          ← one line │
//! │  • B (1x) - $3.00                                             per item │
//! │                                                                         │
//! │  💰 *Total:* $13.00                                         ← price    │
//! │  ⚖️ *Peso estimado:* 250g                                   ← weight   │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//!   render() ──► percent-encode ──► https://wa.me/{recipient}?text={...}
//! ```
//!
//! Currency values always carry two decimals, weight is whole grams.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::cart::{Cart, LineItem};

/// Characters left as-is when encoding a URL component.
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, the same
/// set browsers leave alone in `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Default recipient phone number for orders.
pub const DEFAULT_RECIPIENT: &str = "5354149326";

/// Default greeting placed before the item list.
pub const DEFAULT_GREETING: &str = "¡Hola! Quisiera realizar el siguiente pedido en KoiShop:\n\n";

/// Default messaging endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://wa.me";

/// Percent-encodes a string as a URL component.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

// =============================================================================
// Checkout Template
// =============================================================================

/// Fixed parts of the checkout message: who receives it and how it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTemplate {
    /// Recipient identifier (phone number in international format, digits only).
    pub recipient: String,

    /// Text placed before the item list, including its trailing blank line.
    pub greeting: String,

    /// Base URL of the messaging service.
    pub endpoint: String,
}

impl Default for CheckoutTemplate {
    fn default() -> Self {
        CheckoutTemplate {
            recipient: DEFAULT_RECIPIENT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl CheckoutTemplate {
    /// Creates a template with a custom recipient and the default greeting.
    pub fn for_recipient(recipient: impl Into<String>) -> Self {
        CheckoutTemplate {
            recipient: recipient.into(),
            ..Default::default()
        }
    }

    /// Renders the plain-text order summary.
    pub fn render(&self, cart: &Cart) -> String {
        let list = cart
            .items()
            .iter()
            .map(render_line)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}{}\n\n💰 *Total:* {}\n⚖️ *Peso estimado:* {}g",
            self.greeting,
            list,
            cart.total_price(),
            cart.total_weight()
        )
    }

    /// Renders the summary and percent-encodes it for a deep link.
    pub fn encoded_message(&self, cart: &Cart) -> String {
        encode_component(&self.render(cart))
    }

    /// Full deep link: `{endpoint}/{recipient}?text={encoded message}`.
    pub fn link(&self, cart: &Cart) -> String {
        format!(
            "{}/{}?text={}",
            self.endpoint.trim_end_matches('/'),
            self.recipient,
            self.encoded_message(cart)
        )
    }
}

/// `• {name} ({qty}x) - ${subtotal}`
fn render_line(item: &LineItem) -> String {
    format!("• {} ({}x) - {}", item.name, item.quantity, item.line_total())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use percent_encoding::percent_decode_str;

    fn sample_cart() -> Cart {
        let a = Product::new("A", "A", 500).with_weight(100);
        let b = Product::new("B", "B", 300).with_weight(50);
        let mut cart = Cart::new();
        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&b);
        cart
    }

    #[test]
    fn test_render_lines_and_totals() {
        let message = CheckoutTemplate::default().render(&sample_cart());

        assert_eq!(
            message,
            "¡Hola! Quisiera realizar el siguiente pedido en KoiShop:\n\n\
             • A (2x) - $10.00\n\
             • B (1x) - $3.00\n\n\
             💰 *Total:* $13.00\n\
             ⚖️ *Peso estimado:* 250g"
        );
    }

    #[test]
    fn test_encoded_message_is_fully_encoded() {
        let template = CheckoutTemplate::default();
        let encoded = template.encoded_message(&sample_cart());

        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('$'));
        assert!(encoded.contains("%E2%80%A2%20A%20(2x)%20-%20%2410.00"));
        assert!(encoded.contains("%E2%80%A2%20B%20(1x)%20-%20%243.00"));
        assert!(encoded.contains("%2413.00"));
        assert!(encoded.contains("250g"));

        let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
        assert_eq!(decoded, template.render(&sample_cart()));
    }

    #[test]
    fn test_encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_component("a b&c=d/e?f#g"), "a%20b%26c%3Dd%2Fe%3Ff%23g");
        assert_eq!(encode_component("¡"), "%C2%A1");
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = CheckoutTemplate::default();
        let cart = sample_cart();
        assert_eq!(template.encoded_message(&cart), template.encoded_message(&cart));
    }

    #[test]
    fn test_empty_cart_message() {
        let message = CheckoutTemplate::default().render(&Cart::new());
        assert!(message.ends_with("💰 *Total:* $0.00\n⚖️ *Peso estimado:* 0g"));
    }

    #[test]
    fn test_link() {
        let template = CheckoutTemplate {
            endpoint: "https://wa.me/".to_string(),
            ..CheckoutTemplate::for_recipient("15550001111")
        };
        let link = template.link(&sample_cart());
        assert!(link.starts_with("https://wa.me/15550001111?text=%C2%A1Hola!%20"));
    }
}
