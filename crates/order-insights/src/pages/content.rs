//! Static narrative text shown on the pages.

pub const WELCOME_TITLE: &str = "🚀 Customer Satisfaction Case Study";

pub const WELCOME_BODY: &str = "\
### Why this app?
Late deliveries or slow processing can turn 5‑star fans into refund requests 🥲.
Upload your logistics CSV and explore *where* things break and *how* to fix them.

— **Sections** —

- *Understanding the Problem* → KPI vs review deep‑dives.
- *Factors and Causes* → Worst sellers, cities, products.
- *Conclusion & Insights* → Key takeaways.

- Data to Upload for Analysis → [link](https://drive.google.com/file/d/1h02g6ObGWiTID990u2pWTw5o3aNEYzSb/view?usp=sharing)

Required columns: `order_purchase_timestamp`, `order_approved_at`,
`order_delivered_customer_date`, `order_estimated_delivery_date`,
`review_score`, `freight_value`, `seller_id`, `customer_city`, `product_id`.
";

pub const UNDERSTANDING_INTRO: &str =
    "Focus KPIs: **Delivery Delay**, **Processing Time**, **Freight Value** vs Review Score.";

pub const FACTORS_INTRO: &str = "Which sellers, cities, and products are most problematic?";

pub const CONCLUSION_TITLE: &str = "Conclusion & Insights";

pub const CONCLUSION_BODY: &str = "\
### Key Findings
* **Delivery delays** drive negative reviews.
* **Fast processing** correlates with positive feedback.
* **Freight cost** alone isn’t a deal‑breaker.

### Next Moves
1. Improve ETA accuracy with real‑time tracking.
2. Automate low‑risk order approvals.
3. Target worst sellers/cities/products first.
";

pub const NO_DATA_WARNING: &str = "➡️  Please upload a dataset to view this analysis.";
