use crate::fixed::Fixed;
use crate::state::{CommodityAmount, NationId, WorldState};

/// Market value of a construction bill at current prices.
pub fn construction_cost_value(state: &WorldState, costs: &[CommodityAmount]) -> Fixed {
    costs.iter().fold(Fixed::ZERO, |acc, c| {
        let price = state
            .definitions
            .commodities
            .get(c.commodity.index())
            .map_or(Fixed::ZERO, |com| com.current_price);
        acc + c.amount * price
    })
}

/// Pulls the sliders back inside the limits set by the nation's reforms.
pub fn bound_budget_settings(state: &mut WorldState, nation: NationId) {
    let Some(n) = state.nation_mut(nation) else {
        return;
    };
    let b = n.budget_bounds;
    let budget = &mut n.budget;

    budget.poor_tax = budget.poor_tax.clamp(b.min_tax, b.max_tax.max(b.min_tax));
    budget.middle_tax = budget.middle_tax.clamp(b.min_tax, b.max_tax.max(b.min_tax));
    budget.rich_tax = budget.rich_tax.clamp(b.min_tax, b.max_tax.max(b.min_tax));
    budget.tariffs = budget.tariffs.clamp(b.min_tariff, b.max_tariff.max(b.min_tariff));
    budget.social_spending = budget
        .social_spending
        .clamp(b.min_social_spending, b.max_social_spending.max(b.min_social_spending));
    budget.military_spending = budget.military_spending.clamp(
        b.min_military_spending,
        b.max_military_spending.max(b.min_military_spending),
    );
}
