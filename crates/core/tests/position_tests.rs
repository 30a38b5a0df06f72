// ═══════════════════════════════════════════════════════════════════
// Position Evaluator Tests — aggregation, sell evaluation, breakeven search
// ═══════════════════════════════════════════════════════════════════

use stock_journal_core::errors::CoreError;
use stock_journal_core::models::lot::Lot;
use stock_journal_core::models::position::{AggregateBuy, BreakevenSearch};
use stock_journal_core::models::settings::Settings;
use stock_journal_core::services::position_evaluator::PositionEvaluator;

fn approx(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

fn buy(price: f64, qty: u32) -> Lot {
    Lot::buy(price, qty).unwrap()
}

fn sell(price: f64, qty: u32) -> Lot {
    Lot::sell(price, qty).unwrap()
}

/// 5 @ ₹100 and 5 @ ₹120.
fn two_lots() -> Vec<Lot> {
    vec![buy(100.0, 5), buy(120.0, 5)]
}

fn evaluator() -> PositionEvaluator {
    PositionEvaluator::new()
}

// ═══════════════════════════════════════════════════════════════════
//  aggregate_buys
// ═══════════════════════════════════════════════════════════════════

mod aggregate_buys {
    use super::*;

    #[test]
    fn two_lots_weighted_average() {
        let agg = evaluator().aggregate_buys(&two_lots());
        assert_eq!(agg.lot_count, 2);
        assert_eq!(agg.quantity, 10);
        assert_eq!(agg.turnover, 1100.0);
        approx(agg.avg_buy_price, 110.0, 1e-9);
    }

    #[test]
    fn two_lots_charges() {
        let agg = evaluator().aggregate_buys(&two_lots());
        // ₹5 floor applies to each order
        assert_eq!(agg.brokerage, 10.0);
        assert_eq!(agg.exchange_fee, 0.03);
        assert_eq!(agg.regulatory_fee, 0.0);
        assert_eq!(agg.gst, 1.81);
        assert_eq!(agg.stt, 1.0);
        assert_eq!(agg.stamp_duty, 0.0);
        approx(agg.total_charges, 12.84, 1e-9);
        approx(agg.total_payable, 1112.84, 1e-9);
        approx(agg.avg_cost_per_share, 111.284, 1e-9);
    }

    #[test]
    fn single_lot_matches_single_order_breakdown() {
        let ev = evaluator();
        let agg = ev.aggregate_buys(&[buy(100.0, 10)]);
        let single = ev.calculator().compute_buy_fees(100.0, 10);
        assert_eq!(agg.total_charges, single.total_charges);
        assert_eq!(agg.gst, single.gst);
        assert_eq!(agg.total_payable, single.total_payable());
    }

    #[test]
    fn stamp_duty_rounded_once_across_lots() {
        // Each lot: 0.015% of 3000 = 0.45 → 0 on its own, but 0.9 → 1 together
        let agg = evaluator().aggregate_buys(&[buy(100.0, 30), buy(100.0, 30)]);
        assert_eq!(agg.stamp_duty, 1.0);
        assert_eq!(agg.stt, 6.0);
    }

    #[test]
    fn brokerage_floor_per_lot() {
        let lots = [buy(10.0, 1), buy(10.0, 1), buy(10.0, 1)];
        let agg = evaluator().aggregate_buys(&lots);
        assert_eq!(agg.brokerage, 15.0);
    }

    #[test]
    fn order_independent() {
        let a = buy(123.45, 7);
        let b = buy(987.6, 3);
        let ab = evaluator().aggregate_buys(&[a, b]);
        let ba = evaluator().aggregate_buys(&[b, a]);
        assert_eq!(ab.turnover, ba.turnover);
        assert_eq!(ab.total_charges, ba.total_charges);
        assert_eq!(ab.quantity, ba.quantity);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(evaluator().aggregate_buys(&[]), AggregateBuy::default());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  evaluate_sell
// ═══════════════════════════════════════════════════════════════════

mod evaluate_sell {
    use super::*;

    #[test]
    fn full_exit_uses_total_payable_exactly() {
        let agg = evaluator().aggregate_buys(&two_lots());
        let eval = evaluator().evaluate_sell(130.0, 10, agg.quantity, agg.total_payable);
        assert_eq!(eval.proportional_buy_cost, agg.total_payable);
    }

    #[test]
    fn partial_exit_scales_cost() {
        let eval = evaluator().evaluate_sell(130.0, 4, 10, 1112.84);
        approx(eval.proportional_buy_cost, 1112.84 / 10.0 * 4.0, 1e-9);
    }

    #[test]
    fn profit_and_percent() {
        let eval = evaluator().evaluate_sell(130.0, 10, 10, 1112.84);
        // 1300 - 30.55 charges (exchange fee rounds up to 0.04 here)
        approx(eval.fees.total_charges, 30.55, 1e-9);
        approx(eval.fees.net_receivable, 1269.45, 1e-9);
        approx(eval.net_pnl, 156.61, 1e-6);
        approx(eval.pnl_percent, 156.61 / 1112.84 * 100.0, 1e-6);
        assert!(eval.is_profit());
    }

    #[test]
    fn loss_is_negative() {
        let eval = evaluator().evaluate_sell(100.0, 10, 10, 1112.84);
        assert!(eval.net_pnl < 0.0);
        assert!(eval.pnl_percent < 0.0);
        assert!(!eval.is_profit());
    }

    #[test]
    fn zero_cost_means_zero_percent() {
        let eval = evaluator().evaluate_sell(110.0, 0, 0, 0.0);
        assert_eq!(eval.pnl_percent, 0.0);
        assert_eq!(eval.net_pnl, 0.0);
    }

    #[test]
    fn net_pnl_non_decreasing_in_price() {
        let ev = evaluator();
        let mut previous = f64::NEG_INFINITY;
        // Whole-rupee steps so STT rounding cannot outpace turnover
        for step in 0..200 {
            let price = 90.0 + step as f64;
            let pnl = ev.evaluate_sell(price, 10, 10, 1112.84).net_pnl;
            assert!(pnl >= previous - 1e-9, "P&L dropped at {price}");
            previous = pnl;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  evaluate_position
// ═══════════════════════════════════════════════════════════════════

mod evaluate_position {
    use super::*;

    #[test]
    fn buy_only_position() {
        let pos = evaluator().evaluate_position(&two_lots(), None).unwrap();
        assert_eq!(pos.quantity_bought, 10);
        assert_eq!(pos.quantity_sold, 0);
        assert_eq!(pos.remaining_shares, 10);
        assert_eq!(pos.breakeven_price, 111.28);
        assert!(pos.sell.is_none());
        assert_eq!(pos.net_pnl(), 0.0);
        assert_eq!(pos.pnl_percent(), 0.0);
    }

    #[test]
    fn partial_sell() {
        let s = sell(130.0, 4);
        let pos = evaluator().evaluate_position(&two_lots(), Some(&s)).unwrap();
        assert_eq!(pos.quantity_sold, 4);
        assert_eq!(pos.remaining_shares, 6);
        let eval = pos.sell.unwrap();
        approx(eval.proportional_buy_cost, pos.buy.total_payable * 0.4, 1e-9);
        assert_eq!(pos.net_pnl(), eval.net_pnl);
    }

    #[test]
    fn sell_more_than_bought_rejected() {
        let s = sell(130.0, 11);
        let err = evaluator().evaluate_position(&two_lots(), Some(&s)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(err.field(), Some("sell_quantity"));
    }

    #[test]
    fn no_buy_lots_rejected() {
        let err = evaluator().evaluate_position(&[], None).unwrap_err();
        assert_eq!(err.field(), Some("buy_lots"));
    }

    #[test]
    fn avg_cost_round_trips_through_breakeven() {
        let ev = evaluator();
        let pos = ev.evaluate_position(&two_lots(), None).unwrap();
        let qty = pos.quantity_bought;
        let from_avg_cost = ev.calculator().breakeven(pos.buy.avg_cost_per_share, qty, 0.0);
        let from_charges = ev
            .calculator()
            .breakeven(pos.buy.avg_buy_price, qty, pos.buy.total_charges);
        approx(from_avg_cost, from_charges, 0.01);
        approx(from_avg_cost, pos.breakeven_price, 0.01);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  find_breakeven_price
// ═══════════════════════════════════════════════════════════════════

mod breakeven_search {
    use super::*;

    fn pnl_at(ev: &PositionEvaluator, lots: &[Lot], price: f64, qty: u64) -> f64 {
        let agg = ev.aggregate_buys(lots);
        ev.evaluate_sell(price, qty, agg.quantity, agg.total_payable).net_pnl
    }

    #[test]
    fn two_lots_full_exit() {
        let ev = evaluator();
        let result = ev.find_breakeven_price(&two_lots(), 10).unwrap();
        assert!(result.is_found());
        // (1112.84 + 30.54) / 10 = 114.338 → first tick at or above is 114.34
        approx(result.price(), 114.34, 0.005);
    }

    #[test]
    fn boundary_property() {
        let ev = evaluator();
        let lots = two_lots();
        let price = ev.find_breakeven_price(&lots, 10).unwrap().price();
        assert!(pnl_at(&ev, &lots, price, 10) >= 0.0);
        assert!(pnl_at(&ev, &lots, price - 0.01, 10) < 0.0);
    }

    #[test]
    fn boundary_property_partial_exit() {
        let ev = evaluator();
        let lots = vec![buy(250.0, 40), buy(262.5, 20)];
        let result = ev.find_breakeven_price(&lots, 25).unwrap();
        let price = result.found().expect("breakeven within range");
        assert!(pnl_at(&ev, &lots, price, 25) >= 0.0);
        assert!(pnl_at(&ev, &lots, price - 0.01, 25) < 0.0);
    }

    #[test]
    fn zero_sell_quantity_means_full_exit() {
        let ev = evaluator();
        let full = ev.find_breakeven_price(&two_lots(), 10).unwrap();
        let defaulted = ev.find_breakeven_price(&two_lots(), 0).unwrap();
        assert_eq!(full, defaulted);
    }

    #[test]
    fn starts_at_weighted_average() {
        let ev = evaluator();
        let result = ev.find_breakeven_price(&two_lots(), 10).unwrap();
        assert!(result.price() > 110.0);
    }

    #[test]
    fn exhausted_when_cap_too_small() {
        let ev = PositionEvaluator::with_search(0.01, 10).unwrap();
        let result = ev.find_breakeven_price(&two_lots(), 10).unwrap();
        assert!(!result.is_found());
        assert_eq!(result.found(), None);
        approx(result.price(), 110.10, 1e-9);
        assert!(matches!(result, BreakevenSearch::Exhausted(_)));
    }

    #[test]
    fn coarser_tick_finds_grid_point_above() {
        let ev = PositionEvaluator::with_search(1.0, 100).unwrap();
        let result = ev.find_breakeven_price(&two_lots(), 10).unwrap();
        assert_eq!(result, BreakevenSearch::Found(115.0));
    }

    #[test]
    fn non_positive_tick_rejected() {
        for tick in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let err = PositionEvaluator::with_search(tick, 100).unwrap_err();
            assert_eq!(err.field(), Some("breakeven_tick"), "tick {tick}");
        }
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let err = PositionEvaluator::with_search(0.01, 0).unwrap_err();
        assert_eq!(err.field(), Some("breakeven_max_iterations"));
    }

    #[test]
    fn from_settings_validates() {
        let mut settings = Settings::default();
        assert!(PositionEvaluator::from_settings(&settings).is_ok());
        settings.breakeven_tick = -0.01;
        assert!(PositionEvaluator::from_settings(&settings).is_err());
    }

    #[test]
    fn sell_more_than_bought_rejected() {
        let err = evaluator().find_breakeven_price(&two_lots(), 11).unwrap_err();
        assert_eq!(err.field(), Some("sell_quantity"));
    }

    #[test]
    fn empty_lots_rejected() {
        let err = evaluator().find_breakeven_price(&[], 1).unwrap_err();
        assert_eq!(err.field(), Some("buy_lots"));
    }
}
