//! Delivery order reward summaries.

use crate::models::Order;

/// `"30x Sunflower, 5x Potato"`, or `"No items"` for an empty order.
pub fn format_items(order: &Order) -> String {
    if order.items.is_empty() {
        return "No items".to_string();
    }

    order
        .items
        .iter()
        .map(|(name, quantity)| format!("{}x {}", quantity, name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Orders paying out coins, with a running total.
pub fn coin_reward_lines(orders: &[Order]) -> Vec<String> {
    reward_lines(
        orders,
        |order| order.reward.coins,
        "🪙 Coin Rewards",
        |coins| format!("+{} coins", coins),
        |total| format!("**Total Coins:** {}", total),
    )
}

/// Orders paying out SFL, with a running total.
pub fn sfl_reward_lines(orders: &[Order]) -> Vec<String> {
    reward_lines(
        orders,
        |order| order.reward.sfl,
        "🌼 SFL Rewards",
        |sfl| format!("+{} SFL", sfl),
        |total| format!("**Total SFL:** {:.2}", total),
    )
}

fn reward_lines(
    orders: &[Order],
    reward: impl Fn(&Order) -> Option<f64>,
    header: &str,
    amount: impl Fn(f64) -> String,
    footer: impl Fn(f64) -> String,
) -> Vec<String> {
    let mut total = 0.0;
    let lines: Vec<String> = orders
        .iter()
        .filter_map(|order| reward(order).map(|value| (order, value)))
        .map(|(order, value)| {
            total += value;
            format!("• {}: {} → {}", order.from, format_items(order), amount(value))
        })
        .collect();

    if lines.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(header.to_string());
    out.extend(lines);
    out.push(footer(total));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Collection, Extra, OrderReward};
    use pretty_assertions::assert_eq;

    fn order(from: &str, items: &[(&str, f64)], coins: Option<f64>, sfl: Option<f64>) -> Order {
        Order {
            id: from.to_string(),
            from: from.to_string(),
            items: items
                .iter()
                .map(|(name, qty)| (name.to_string(), *qty))
                .collect::<Collection<f64>>(),
            reward: OrderReward {
                coins,
                sfl,
                extra: Extra::new(),
            },
            created_at: 0.0,
            ready_at: 0.0,
            completed_at: None,
            extra: Extra::new(),
        }
    }

    #[test]
    fn test_format_items() {
        let o = order("betty", &[("Sunflower", 30.0), ("Potato", 5.0)], None, None);
        assert_eq!(format_items(&o), "30x Sunflower, 5x Potato");

        let empty = order("betty", &[], None, None);
        assert_eq!(format_items(&empty), "No items");
    }

    #[test]
    fn test_coin_rewards() {
        let orders = vec![
            order("betty", &[("Sunflower", 30.0)], Some(64.0), None),
            order("grubnuk", &[("Pumpkin Soup", 1.0)], None, Some(0.35)),
            order("blacksmith", &[("Iron", 2.0)], Some(120.5), None),
        ];

        assert_eq!(
            coin_reward_lines(&orders),
            vec![
                "🪙 Coin Rewards".to_string(),
                "• betty: 30x Sunflower → +64 coins".to_string(),
                "• blacksmith: 2x Iron → +120.5 coins".to_string(),
                "**Total Coins:** 184.5".to_string(),
            ]
        );
    }

    #[test]
    fn test_sfl_rewards() {
        let orders = vec![
            order("grubnuk", &[("Pumpkin Soup", 1.0)], None, Some(0.35)),
            order("tywin", &[], None, Some(1.2)),
        ];

        assert_eq!(
            sfl_reward_lines(&orders),
            vec![
                "🌼 SFL Rewards".to_string(),
                "• grubnuk: 1x Pumpkin Soup → +0.35 SFL".to_string(),
                "• tywin: No items → +1.2 SFL".to_string(),
                "**Total SFL:** 1.55".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_qualifying_orders() {
        let orders = vec![order("betty", &[("Sunflower", 1.0)], Some(5.0), None)];
        assert!(sfl_reward_lines(&orders).is_empty());
        assert!(coin_reward_lines(&[]).is_empty());
    }

    #[test]
    fn test_completed_orders_still_counted() {
        let mut done = order("betty", &[("Sunflower", 1.0)], Some(5.0), None);
        done.completed_at = Some(10.0);
        let open = order("tango", &[("Egg", 2.0)], Some(7.0), None);

        assert_eq!(
            coin_reward_lines(&[done, open]),
            vec![
                "🪙 Coin Rewards".to_string(),
                "• betty: 1x Sunflower → +5 coins".to_string(),
                "• tango: 2x Egg → +7 coins".to_string(),
                "**Total Coins:** 12".to_string(),
            ]
        );
    }
}
