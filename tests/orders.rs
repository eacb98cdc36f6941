use binapi::exchange::client::order_params;
use binapi::models::price::{format_fixed, format_plain};
use binapi::models::{OrderRequest, OrderStatus, OrderType, Side, StatusFilter, TimeInForce};
use binapi::ErrorKind;

#[test]
fn prices_truncate_toward_zero() {
    assert_eq!(format_fixed(36230.129, 2).expect("format"), "36230.12");
    assert_eq!(format_fixed(-1.999, 2).expect("format"), "-1.99");
    assert_eq!(format_fixed(0.5, 2).expect("format"), "0.5");
    assert_eq!(format_fixed(42000.0, 2).expect("format"), "42000");
    assert_eq!(format_fixed(1.23456789, 0).expect("format"), "1");
}

#[test]
fn plain_format_never_uses_exponent() {
    assert_eq!(format_plain(0.0000001).expect("format"), "0.0000001");
    assert_eq!(format_plain(0.010).expect("format"), "0.01");
    assert_eq!(format_plain(12.0).expect("format"), "12");
    assert_eq!(format_plain(1e15).expect("format"), "1000000000000000");
}

#[test]
fn non_finite_numbers_are_rejected() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(
            format_fixed(value, 2).expect_err("error").kind,
            ErrorKind::InvalidInput
        );
    }
}

#[test]
fn protective_orders_trade_against_the_position() {
    let take_profit = OrderRequest::take_profit_limit("BTCUSDT", Side::Sell, 1.0, 39000.0, 39100.0);
    assert_eq!(take_profit.side, Side::Buy);
    assert_eq!(take_profit.order_type, OrderType::TakeProfit);
    assert!(take_profit.order_type.is_take_profit());
    assert_eq!(take_profit.price, Some(39000.0));
    assert_eq!(take_profit.stop_price, Some(39100.0));
    assert!(take_profit.reduce_only);
    assert!(take_profit.price_protection);
    assert_eq!(take_profit.time_in_force, Some(TimeInForce::Gtc));

    let stop = OrderRequest::stop_loss_limit("BTCUSDT", Side::Buy, 1.0, 41000.0, 41100.0);
    assert_eq!(stop.side, Side::Sell);
    assert!(stop.order_type.is_stop());
    assert!(!stop.order_type.is_take_profit());
}

#[test]
fn reduce_only_limit_is_post_only() {
    let order = OrderRequest::reduce_only_limit("BTCUSDT", Side::Sell, 0.2, 43000.0);
    assert_eq!(order.time_in_force, Some(TimeInForce::Gtx));
    let params = order_params(&order, 2).expect("params");
    assert_eq!(params.get("timeInForce"), Some("GTX"));
    assert_eq!(params.get("reduceOnly"), Some("true"));
}

#[test]
fn take_profit_market_params_in_wire_order() {
    let order = OrderRequest::take_profit_market("ETHUSDT", Side::Buy, 0.25, 2500.555);
    let params = order_params(&order, 2).expect("params");
    assert_eq!(
        params.query_string(),
        "symbol=ETHUSDT&side=SELL&type=TAKE_PROFIT_MARKET&quantity=0.25&stopPrice=2500.55\
         &timeInForce=GTC&reduceOnly=true&workingType=MARK_PRICE&priceProtection=true"
    );
}

#[test]
fn order_params_validate_input() {
    let no_symbol = OrderRequest::market(" ", Side::Buy, 1.0, false);
    assert_eq!(
        order_params(&no_symbol, 2).expect_err("error").kind,
        ErrorKind::InvalidInput
    );
    let negative = OrderRequest::market("BTCUSDT", Side::Buy, -1.0, false);
    assert_eq!(
        order_params(&negative, 2).expect_err("error").kind,
        ErrorKind::InvalidInput
    );
}

#[test]
fn sides_reverse_and_parse() {
    assert_eq!(Side::Buy.reverse(), Side::Sell);
    assert_eq!(Side::Sell.reverse(), Side::Buy);
    assert_eq!(Side::Sell.sign(), -1.0);
    assert_eq!("BUY".parse::<Side>().expect("side"), Side::Buy);
    assert!("buy".parse::<Side>().is_err());
}

#[test]
fn status_filter_parses_all_or_one_status() {
    assert_eq!(StatusFilter::default(), StatusFilter::Only(OrderStatus::New));
    assert_eq!("ALL".parse::<StatusFilter>().expect("filter"), StatusFilter::All);
    assert_eq!(
        "FILLED".parse::<StatusFilter>().expect("filter"),
        StatusFilter::Only(OrderStatus::Filled)
    );
    assert_eq!(
        "CANCELLED".parse::<OrderStatus>().expect("status"),
        OrderStatus::Canceled
    );
}
