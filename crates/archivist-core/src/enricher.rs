//! Conversion enrichment. Runs once, after the last conversion row has been
//! accumulated and before any table is archived.

use crate::accumulator::{LabelTable, PivotTable};

pub fn enrich(table: &mut LabelTable) {
    for (_, metrics) in table.iter_mut() {
        metrics.enrich_with_conversions();
    }
}

pub fn enrich_pivot(pivot: &mut PivotTable) {
    for (_, inner) in pivot.iter_mut() {
        enrich(inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{GoalMetrics, MetricsRow};

    #[test]
    fn enriches_every_inner_table_of_a_pivot() {
        let mut pivot: PivotTable = LabelTable::new();
        pivot
            .cell_mut("spring-sale", "shoes", MetricsRow::default)
            .goal_mut(3, || GoalMetrics::for_goal(3))
            .merge(&GoalMetrics {
                nb_conversions: 2,
                nb_visits_converted: 2,
                revenue: 30.0,
                ecommerce: None,
            });
        pivot.cell_mut("spring-sale", "hats", MetricsRow::default);

        enrich_pivot(&mut pivot);

        let inner = pivot.get("spring-sale").expect("campaign");
        assert_eq!(inner.get("shoes").and_then(|m| m.nb_conversions), Some(2));
        assert_eq!(inner.get("shoes").and_then(|m| m.revenue), Some(30.0));
        assert_eq!(inner.get("hats").and_then(|m| m.nb_conversions), None);
    }
}
