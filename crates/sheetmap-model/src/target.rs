use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target entity tables an uploaded sheet can be classified into.
///
/// Declaration order doubles as the tie-break priority used when two tables
/// score equally: inventory, then vendor, then purchase order, then sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTable {
    /// Products held in stock.
    Inventory,
    /// Suppliers the business buys from.
    Vendor,
    /// Orders placed with a vendor.
    PurchaseOrder,
    /// Orders placed by a customer.
    SalesOrder,
}

impl TargetTable {
    /// All tables in priority order.
    pub const ALL: [TargetTable; 4] = [
        TargetTable::Inventory,
        TargetTable::Vendor,
        TargetTable::PurchaseOrder,
        TargetTable::SalesOrder,
    ];

    /// Canonical table name as used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTable::Inventory => "inventory",
            TargetTable::Vendor => "vendor",
            TargetTable::PurchaseOrder => "purchase_order",
            TargetTable::SalesOrder => "sales_order",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TargetTable::Inventory => "Inventory",
            TargetTable::Vendor => "Vendor",
            TargetTable::PurchaseOrder => "Purchase Order",
            TargetTable::SalesOrder => "Sales Order",
        }
    }

    /// Position in the tie-break priority (0 = preferred).
    pub fn priority(&self) -> usize {
        match self {
            TargetTable::Inventory => 0,
            TargetTable::Vendor => 1,
            TargetTable::PurchaseOrder => 2,
            TargetTable::SalesOrder => 3,
        }
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetTable {
    type Err = String;

    /// Parse a table name, accepting the aliases uploaders commonly use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "inventory" | "product" | "products" | "item" | "items" => Ok(TargetTable::Inventory),
            "vendor" | "vendors" | "supplier" | "suppliers" => Ok(TargetTable::Vendor),
            "purchase_order" | "purchase_orders" | "po" => Ok(TargetTable::PurchaseOrder),
            "sales_order" | "sales_orders" | "so" => Ok(TargetTable::SalesOrder),
            _ => Err(format!("Unknown target table: {}", s)),
        }
    }
}

/// Primitive semantic type of a field or target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Decimal,
    Date,
    Boolean,
    /// Code-like string such as `P001` or `PO-2025-001`.
    Identifier,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Identifier => "identifier",
        }
    }

    /// Returns true for the two string-shaped types.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Identifier)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" | "char" => Ok(FieldType::String),
            "integer" | "int" => Ok(FieldType::Integer),
            "decimal" | "float" | "number" | "numeric" => Ok(FieldType::Decimal),
            "date" | "datetime" => Ok(FieldType::Date),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "identifier" | "id" => Ok(FieldType::Identifier),
            _ => Err(format!("Unknown field type: {}", s)),
        }
    }
}
