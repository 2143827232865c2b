//! Standard Egyptian chart of accounts seeded for new tenants.

use crate::ledger::types::AccountType;
use crate::ledger::types::AccountType::{Asset, Equity, Expense, Liability, Revenue};

/// One row of the chart template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateAccount {
    /// Account code.
    pub code: &'static str,
    /// English name.
    pub name_en: &'static str,
    /// Arabic name.
    pub name_ar: &'static str,
    /// Classification.
    pub account_type: AccountType,
    /// Structural node.
    pub is_header: bool,
    /// Parent code; parents always precede their children.
    pub parent_code: Option<&'static str>,
}

const fn header(
    code: &'static str,
    name_en: &'static str,
    name_ar: &'static str,
    account_type: AccountType,
    parent_code: Option<&'static str>,
) -> TemplateAccount {
    TemplateAccount {
        code,
        name_en,
        name_ar,
        account_type,
        is_header: true,
        parent_code,
    }
}

const fn leaf(
    code: &'static str,
    name_en: &'static str,
    name_ar: &'static str,
    account_type: AccountType,
    parent_code: &'static str,
) -> TemplateAccount {
    TemplateAccount {
        code,
        name_en,
        name_ar,
        account_type,
        is_header: false,
        parent_code: Some(parent_code),
    }
}

/// The standard chart, parents first.
pub const STANDARD_CHART: &[TemplateAccount] = &[
    header("1", "Assets", "الأصول", Asset, None),
    header("11", "Current Assets", "الأصول المتداولة", Asset, Some("1")),
    leaf("1101", "Cash on Hand", "النقدية بالصندوق", Asset, "11"),
    leaf("1102", "Banks", "البنوك", Asset, "11"),
    leaf("1103", "Customers", "العملاء", Asset, "11"),
    leaf("1104", "Inventory", "المخزون", Asset, "11"),
    leaf("1105", "Prepaid Expenses", "مصروفات مدفوعة مقدماً", Asset, "11"),
    leaf("1106", "Input VAT", "ضريبة القيمة المضافة - مدخلات", Asset, "11"),
    header("12", "Fixed Assets", "الأصول الثابتة", Asset, Some("1")),
    leaf("1201", "Land", "الأراضي", Asset, "12"),
    leaf("1202", "Buildings", "المباني", Asset, "12"),
    leaf("1203", "Machinery and Equipment", "الآلات والمعدات", Asset, "12"),
    leaf("1204", "Vehicles", "وسائل النقل", Asset, "12"),
    leaf("1205", "Furniture and Fixtures", "الأثاث والتجهيزات", Asset, "12"),
    leaf("1206", "Accumulated Depreciation", "مجمع الإهلاك", Asset, "12"),
    header("2", "Liabilities", "الخصوم", Liability, None),
    header("21", "Current Liabilities", "الخصوم المتداولة", Liability, Some("2")),
    leaf("2101", "Suppliers", "الموردون", Liability, "21"),
    leaf("2102", "Output VAT", "ضريبة القيمة المضافة - مخرجات", Liability, "21"),
    leaf("2103", "Withholding Tax Payable", "ضريبة الخصم والإضافة", Liability, "21"),
    leaf("2104", "Salaries Payable", "أجور مستحقة", Liability, "21"),
    leaf("2105", "Social Insurance Payable", "التأمينات الاجتماعية المستحقة", Liability, "21"),
    header("22", "Long-term Liabilities", "الخصوم طويلة الأجل", Liability, Some("2")),
    leaf("2201", "Long-term Loans", "قروض طويلة الأجل", Liability, "22"),
    header("3", "Equity", "حقوق الملكية", Equity, None),
    leaf("3101", "Capital", "رأس المال", Equity, "3"),
    leaf("3102", "Legal Reserve", "الاحتياطي القانوني", Equity, "3"),
    leaf("3103", "Retained Earnings", "الأرباح المرحلة", Equity, "3"),
    leaf("3104", "Owner Drawings", "المسحوبات الشخصية", Equity, "3"),
    header("4", "Revenue", "الإيرادات", Revenue, None),
    header("41", "Operating Revenue", "إيرادات النشاط", Revenue, Some("4")),
    leaf("4101", "Sales", "المبيعات", Revenue, "41"),
    leaf("4102", "Sales Returns", "مردودات المبيعات", Revenue, "41"),
    leaf("4103", "Service Revenue", "إيرادات الخدمات", Revenue, "41"),
    header("42", "Other Revenue", "إيرادات أخرى", Revenue, Some("4")),
    leaf("4201", "Other Income", "إيرادات متنوعة", Revenue, "42"),
    header("5", "Expenses", "المصروفات", Expense, None),
    header("51", "Cost of Sales", "تكلفة المبيعات", Expense, Some("5")),
    leaf("5101", "Cost of Goods Sold", "تكلفة البضاعة المباعة", Expense, "51"),
    header("52", "Operating Expenses", "المصروفات التشغيلية", Expense, Some("5")),
    leaf("5201", "Salaries and Wages", "الأجور والمرتبات", Expense, "52"),
    leaf("5202", "Rent", "الإيجار", Expense, "52"),
    leaf("5203", "Utilities", "المرافق", Expense, "52"),
    leaf("5204", "Depreciation Expense", "مصروف الإهلاك", Expense, "52"),
    leaf("5205", "Bank Charges", "مصروفات بنكية", Expense, "52"),
    leaf("5206", "Marketing", "مصروفات تسويقية", Expense, "52"),
];
