pub mod analytics_service;
pub mod fee_calculator;
pub mod journal_service;
pub mod position_evaluator;
