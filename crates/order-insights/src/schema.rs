//! Column-name constants for the order dataset.
//! Single source of truth for the loader, the deriver and the pages.

// ── Raw order columns ───────────────────────────────────────────────────────
pub mod order {
    pub const SELLER_ID: &str = "seller_id";
    pub const CUSTOMER_CITY: &str = "customer_city";
    pub const PRODUCT_ID: &str = "product_id";
    pub const REVIEW_SCORE: &str = "review_score";
    pub const FREIGHT_VALUE: &str = "freight_value";

    pub const PURCHASED_AT: &str = "order_purchase_timestamp";
    pub const APPROVED_AT: &str = "order_approved_at";
    pub const DELIVERED_AT: &str = "order_delivered_customer_date";
    pub const ESTIMATED_DELIVERY_AT: &str = "order_estimated_delivery_date";

    pub const TIMESTAMPS: [&str; 4] = [PURCHASED_AT, APPROVED_AT, DELIVERED_AT, ESTIMATED_DELIVERY_AT];

    pub const REQUIRED: [&str; 9] = [
        PURCHASED_AT,
        APPROVED_AT,
        DELIVERED_AT,
        ESTIMATED_DELIVERY_AT,
        REVIEW_SCORE,
        FREIGHT_VALUE,
        SELLER_ID,
        CUSTOMER_CITY,
        PRODUCT_ID,
    ];
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const DELIVERY_DELAY: &str = "delivery_delay";
    pub const PROCESSING_TIME: &str = "processing_time";
    pub const DELAY_CATEGORY: &str = "delay_category";
    pub const REVIEW_CATEGORY: &str = "review_category";

    pub const ALL: [&str; 4] = [DELIVERY_DELAY, PROCESSING_TIME, DELAY_CATEGORY, REVIEW_CATEGORY];
}
