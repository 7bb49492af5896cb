use serde::Serialize;

#[derive(sqlx::FromRow, Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub description: String,
    pub quantity: f64,
    /// Unit price
    pub price: f64,
    /// Tax rate in percent (15.0 = 15%)
    pub tax: f64,
}

impl InvoiceItem {
    /// Quantity times unit price, tax excluded
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }

    /// Line total with the item's own tax rate applied
    pub fn taxed_total(&self) -> f64 {
        let line_total = self.line_total();
        line_total + line_total * self.tax / 100.0
    }
}
