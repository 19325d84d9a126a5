//! 통합 테스트 공용 시계열 생성기.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scanner_core::{decimal_from_f64, DailyBar};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

/// 시가 = 종가, 고가/저가 = 종가 ± spread.
pub fn bar(day: i64, close: Decimal, spread: Decimal, volume: Decimal) -> DailyBar {
    DailyBar::new(
        start_date() + Duration::days(day),
        close,
        close + spread,
        close - spread,
        close,
        volume,
    )
}

/// 주기 10일의 파동을 포함한 완만한 상승 추세.
///
/// 종가 = 100 + 0.5i + 2·sin(36°·i). 고점과 저점이 매 주기 5씩 높아집니다.
pub fn wavy_uptrend(len: usize) -> Vec<DailyBar> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + 0.5 * x + 2.0 * (36.0 * x).to_radians().sin();
            let close = decimal_from_f64(close).unwrap().round_dp(4);
            bar(i as i64, close, dec!(1), dec!(1000000))
        })
        .collect()
}

/// 200일 횡보 후 마지막 봉에서 3배 거래량으로 돌파.
pub fn range_breakout() -> Vec<DailyBar> {
    let mut bars: Vec<DailyBar> = (0..200)
        .map(|i| {
            let close = if i % 2 == 0 { dec!(99.5) } else { dec!(100.5) };
            DailyBar::new(
                start_date() + Duration::days(i),
                close,
                dec!(101),
                close - dec!(1),
                close,
                dec!(1000000),
            )
        })
        .collect();
    bars.push(DailyBar::new(
        start_date() + Duration::days(200),
        dec!(100.5),
        dec!(106.5),
        dec!(100),
        dec!(106),
        dec!(3000000),
    ));
    bars
}

/// 매일 1씩 하락.
pub fn steady_decline(len: usize) -> Vec<DailyBar> {
    (0..len)
        .map(|i| bar(i as i64, Decimal::from(400 - i as i64), dec!(1), dec!(1000000)))
        .collect()
}
