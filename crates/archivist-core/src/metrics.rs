//! Summable metric rows.
//!
//! Every merge here is commutative and associative: counters add, `max_actions`
//! takes the maximum, optional columns add when either side has a value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::datatable::SortColumn;

/// Goal id used for ecommerce orders.
pub const GOAL_ORDER: i64 = 0;
/// Goal id used for abandoned ecommerce carts.
pub const GOAL_CART: i64 = -1;

/// Numeric contribution of one grouped visit row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitMetrics {
    pub nb_uniq_visitors: u64,
    pub nb_visits: u64,
    pub nb_actions: u64,
    pub max_actions: u64,
    /// Total visit length in seconds.
    pub sum_visit_length: u64,
    /// Visits with a single action.
    pub bounce_count: u64,
    pub nb_visits_converted: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EcommerceMetrics {
    pub revenue_subtotal: f64,
    pub revenue_tax: f64,
    pub revenue_shipping: f64,
    pub revenue_discount: f64,
    pub items: u64,
}

impl EcommerceMetrics {
    pub fn merge(&mut self, other: &EcommerceMetrics) {
        self.revenue_subtotal += other.revenue_subtotal;
        self.revenue_tax += other.revenue_tax;
        self.revenue_shipping += other.revenue_shipping;
        self.revenue_discount += other.revenue_discount;
        self.items += other.items;
    }
}

/// Conversion totals for one goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalMetrics {
    pub nb_conversions: u64,
    pub nb_visits_converted: u64,
    pub revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecommerce: Option<EcommerceMetrics>,
}

impl GoalMetrics {
    /// Empty row shaped for `idgoal`: ecommerce goals (order and cart) carry
    /// the ecommerce columns, regular goals do not.
    pub fn for_goal(idgoal: i64) -> Self {
        Self {
            ecommerce: (idgoal <= GOAL_ORDER).then(EcommerceMetrics::default),
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: &GoalMetrics) {
        self.nb_conversions += other.nb_conversions;
        self.nb_visits_converted += other.nb_visits_converted;
        self.revenue += other.revenue;
        match (self.ecommerce.as_mut(), other.ecommerce.as_ref()) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.ecommerce = Some(*theirs),
            _ => {}
        }
    }
}

/// Aggregated metrics for one report label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsRow {
    pub nb_uniq_visitors: u64,
    pub nb_visits: u64,
    pub nb_actions: u64,
    pub max_actions: u64,
    pub sum_visit_length: u64,
    pub bounce_count: u64,
    /// Dropped by conversion enrichment: once per-goal rows exist the generic
    /// count no longer matches their sum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nb_visits_converted: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nb_conversions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub goals: BTreeMap<i64, GoalMetrics>,
}

fn sum_opt<T: std::ops::Add<Output = T> + Copy>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

impl MetricsRow {
    /// Merge one grouped visit row into the running totals.
    pub fn add_visit(&mut self, visit: &VisitMetrics) {
        self.nb_uniq_visitors += visit.nb_uniq_visitors;
        self.nb_visits += visit.nb_visits;
        self.nb_actions += visit.nb_actions;
        self.max_actions = self.max_actions.max(visit.max_actions);
        self.sum_visit_length += visit.sum_visit_length;
        self.bounce_count += visit.bounce_count;
        self.nb_visits_converted = sum_opt(self.nb_visits_converted, Some(visit.nb_visits_converted));
    }

    /// Goal sub-row for `idgoal`, created with `make` on first use.
    pub fn goal_mut(&mut self, idgoal: i64, make: impl FnOnce() -> GoalMetrics) -> &mut GoalMetrics {
        self.goals.entry(idgoal).or_insert_with(make)
    }

    /// Field-wise sum of two aggregated rows, goals included.
    pub fn merge(&mut self, other: &MetricsRow) {
        self.nb_uniq_visitors += other.nb_uniq_visitors;
        self.nb_visits += other.nb_visits;
        self.nb_actions += other.nb_actions;
        self.max_actions = self.max_actions.max(other.max_actions);
        self.sum_visit_length += other.sum_visit_length;
        self.bounce_count += other.bounce_count;
        self.nb_visits_converted = sum_opt(self.nb_visits_converted, other.nb_visits_converted);
        self.nb_conversions = sum_opt(self.nb_conversions, other.nb_conversions);
        self.revenue = sum_opt(self.revenue, other.revenue);
        for (idgoal, goal) in &other.goals {
            self.goals
                .entry(*idgoal)
                .or_insert_with(|| GoalMetrics::for_goal(*idgoal))
                .merge(goal);
        }
    }

    /// Fold the per-goal rows into the row-level conversion columns.
    ///
    /// Abandoned-cart revenue is lost revenue, so only goals with an id of at
    /// least [`GOAL_ORDER`] count towards `nb_conversions` and `revenue`.
    pub fn enrich_with_conversions(&mut self) {
        if self.goals.is_empty() {
            return;
        }
        self.nb_visits_converted = None;
        let (conversions, revenue) = self
            .goals
            .iter()
            .filter(|(idgoal, _)| **idgoal >= GOAL_ORDER)
            .fold((0u64, 0.0f64), |(conversions, revenue), (_, goal)| {
                (conversions + goal.nb_conversions, revenue + goal.revenue)
            });
        self.nb_conversions = Some(conversions);
        self.revenue = Some(revenue);
    }

    pub fn column_value(&self, column: SortColumn) -> f64 {
        match column {
            SortColumn::NbVisits => self.nb_visits as f64,
            SortColumn::NbUniqVisitors => self.nb_uniq_visitors as f64,
            SortColumn::NbActions => self.nb_actions as f64,
            SortColumn::NbConversions => self.nb_conversions.unwrap_or(0) as f64,
            SortColumn::Revenue => self.revenue.unwrap_or(0.0),
        }
    }
}
