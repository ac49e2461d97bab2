use super::common::*;
use crate::pricing::domain::{ClientType, Complexity, Location, LoyaltyLevel, QuoteRequest};
use crate::pricing::rates::{RateTables, SurchargeRates};
use crate::pricing::compute_quote;

#[test]
fn basic_individual_quote_matches_reference_figures() {
    let breakdown = quote(&basic_individual_request());

    assert_close(breakdown.base_price, 199.0);
    assert_close(breakdown.complexity_adjustment, 0.0);
    assert_close(breakdown.rush_fee, 0.0);
    assert_close(breakdown.subtotal, 199.0);
    assert_close(breakdown.total_discount, 0.0);
    assert_close(breakdown.tax_amount, 16.4175);
    assert_close(breakdown.processing_fee, 6.247_107_5);
    assert_close(breakdown.total, 221.66);
}

#[test]
fn rush_fee_is_taxed_and_charged_processing() {
    let standard = quote(&basic_individual_request());
    let rush = quote(&QuoteRequest {
        is_rush: true,
        ..basic_individual_request()
    });

    assert_close(rush.rush_fee, 50.0);
    assert_close(rush.subtotal, 249.0);
    assert_close(rush.total, 277.36);
    assert!(rush.total - standard.total > 50.0);
}

#[test]
fn client_and_loyalty_discounts_add_instead_of_compounding() {
    let breakdown = quote(&vip_gold_request());

    assert_close(breakdown.discount_rate, 0.18);
    assert_close(breakdown.client_discount, 19.9);
    assert_close(breakdown.loyalty_discount, 15.92);
    assert_close(breakdown.total_discount, 199.0 * 0.18);
    assert_close(breakdown.total, 181.76);
}

#[test]
fn unknown_service_type_falls_back_to_default_pricing() {
    let breakdown = quote(&QuoteRequest {
        service_type: Some("estate-trust-1041".to_string()),
        is_rush: true,
        ..QuoteRequest::default()
    });

    assert_close(breakdown.base_price, 199.0);
    assert_close(breakdown.rush_fee, 50.0);
    assert_close(breakdown.subtotal, 249.0);
}

#[test]
fn missing_service_type_is_not_an_error() {
    let breakdown = quote(&QuoteRequest::default());

    assert_close(breakdown.base_price, 199.0);
    assert_close(breakdown.rush_fee, 0.0);
    assert_close(breakdown.total, 221.66);
}

#[test]
fn complexity_absent_from_table_is_skipped() {
    let mut tables = RateTables::standard();
    tables.complexity_multipliers.remove(&Complexity::Complex);
    tables.location_multipliers.remove(&Location::Urban);

    let request = QuoteRequest {
        service_type: Some("individual-premium".to_string()),
        complexity: Some(Complexity::Complex),
        location: Some(Location::Urban),
        ..QuoteRequest::default()
    };
    let breakdown = compute_quote(&tables, &SurchargeRates::STANDARD, &request);

    assert_close(breakdown.complexity_adjustment, 0.0);
    assert_close(breakdown.location_adjustment, 0.0);
    assert_close(breakdown.subtotal, 399.0);
}

#[test]
fn adjustments_itemise_the_subtotal() {
    let request = QuoteRequest {
        service_type: Some("business-basic".to_string()),
        complexity: Some(Complexity::Moderate),
        is_rush: true,
        client_type: Some(ClientType::Returning),
        location: Some(Location::Urban),
        seasonal_factor: Some(1.2),
        loyalty_level: Some(LoyaltyLevel::Silver),
    };
    let breakdown = quote(&request);

    let adjusted = 799.0 * 1.3;
    assert_close(breakdown.complexity_adjustment, adjusted - 799.0);
    assert_close(breakdown.location_adjustment, adjusted * 0.1);
    assert_close(breakdown.seasonal_adjustment, adjusted * 1.1 * 0.2);
    assert_close(breakdown.rush_fee, 150.0);
    assert_close(
        breakdown.subtotal,
        breakdown.base_price
            + breakdown.complexity_adjustment
            + breakdown.location_adjustment
            + breakdown.seasonal_adjustment
            + breakdown.rush_fee,
    );
    assert_close(breakdown.discount_rate, 0.10);
}

#[test]
fn quotes_are_idempotent() {
    let request = vip_gold_request();
    assert_eq!(quote(&request), quote(&request));
}

#[test]
fn higher_complexity_never_lowers_the_total() {
    for service in ["individual-basic", "business-premium", "unlisted-service"] {
        let totals: Vec<f64> = Complexity::ordered()
            .into_iter()
            .map(|complexity| {
                quote(&QuoteRequest {
                    service_type: Some(service.to_string()),
                    complexity: Some(complexity),
                    ..vip_gold_request()
                })
                .total
            })
            .collect();

        assert!(
            totals.windows(2).all(|pair| pair[0] <= pair[1]),
            "{service}: {totals:?}"
        );
    }
}

#[test]
fn larger_discounts_never_raise_the_total() {
    let totals: Vec<f64> = LoyaltyLevel::ordered()
        .into_iter()
        .map(|level| {
            quote(&QuoteRequest {
                loyalty_level: Some(level),
                ..basic_individual_request()
            })
            .total
        })
        .collect();

    assert!(totals.windows(2).all(|pair| pair[0] >= pair[1]), "{totals:?}");
}

#[test]
fn total_covers_discounted_subtotal_for_every_tier_combination() {
    let tables = RateTables::standard();
    let services: Vec<Option<String>> = tables
        .base_pricing
        .keys()
        .cloned()
        .map(Some)
        .chain([None])
        .collect();

    for service in &services {
        for complexity in Complexity::ordered() {
            for client in ClientType::ordered() {
                for loyalty in LoyaltyLevel::ordered() {
                    for location in Location::ordered() {
                        for is_rush in [false, true] {
                            let request = QuoteRequest {
                                service_type: service.clone(),
                                complexity: Some(complexity),
                                is_rush,
                                client_type: Some(client),
                                location: Some(location),
                                seasonal_factor: None,
                                loyalty_level: Some(loyalty),
                            };
                            let breakdown = quote(&request);
                            assert!(breakdown.total >= 0.0);
                            assert!(
                                breakdown.total + 0.005 >= breakdown.discounted_subtotal(),
                                "{request:?} -> {breakdown:?}"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn rush_never_lowers_the_total() {
    for service in ["individual-basic", "payroll-monthly", "unlisted-service"] {
        let mut request = QuoteRequest::for_service(service);
        let standard = quote(&request).total;
        request.is_rush = true;
        assert!(quote(&request).total >= standard, "{service}");
    }
}

#[test]
fn negative_seasonal_factor_keeps_total_non_negative() {
    let breakdown = quote(&QuoteRequest {
        seasonal_factor: Some(-3.0),
        ..basic_individual_request()
    });

    assert_close(breakdown.seasonal_adjustment, 0.0);
    assert_close(breakdown.total, 221.66);
}

#[test]
fn zero_seasonal_factor_leaves_only_the_rush_fee() {
    let breakdown = quote(&QuoteRequest {
        is_rush: true,
        seasonal_factor: Some(0.0),
        ..basic_individual_request()
    });

    assert_close(breakdown.rush_fee, 50.0);
    assert_close(breakdown.seasonal_adjustment, -199.0);
    assert_close(breakdown.subtotal, breakdown.rush_fee);
    assert!(breakdown.total > 0.0);
}
