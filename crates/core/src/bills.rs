//! Invoices for completed assignments, plus the bill search page.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::criteria::{Criteria, DateRange, StatusFilter};
use crate::error::{CoreError, FieldError};
use crate::money::Money;
use crate::record::{parse_optional_date, unknown_field, Draft, Record};
use crate::status::Status;
use crate::types::{parse_date, Date, EntityKind, RecordId};
use crate::view::ListConfig;

define_status_enum! {
    /// Payment state of an invoice.
    BillStatus (initial = Unpaid) {
        Paid => "paid",
        Unpaid => "unpaid",
        Overdue => "overdue",
    }
}

pub const BILL_LIST: ListConfig = ListConfig {
    searchable_fields: &["invoice_number", "job_ref", "job_title", "client"],
    required_fields: &["job_title", "date", "due_date", "amount"],
};

pub type BillList = RecordListController<Bill>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: RecordId,
    /// Display number, e.g. `INV-001`.
    pub invoice_number: String,
    /// Associated job reference, e.g. `JOB-2024-001`.
    pub job_ref: String,
    pub date: Option<Date>,
    pub due_date: Option<Date>,
    pub amount: Money,
    pub status: BillStatus,
    pub job_title: String,
    pub client: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBill {
    /// Left blank to derive `INV-{id:03}` on creation.
    pub invoice_number: String,
    pub job_ref: String,
    pub date: Option<Date>,
    pub due_date: Option<Date>,
    pub amount: Option<Money>,
    pub status: BillStatus,
    pub job_title: String,
    pub client: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateBill {
    pub job_ref: Option<String>,
    pub date: Option<Date>,
    pub due_date: Option<Date>,
    pub amount: Option<Money>,
    pub status: Option<BillStatus>,
    pub job_title: Option<String>,
    pub client: Option<String>,
}

impl UpdateBill {
    pub fn status(status: BillStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Invoice number derived from the store id.
pub fn invoice_number(id: RecordId) -> String {
    format!("INV-{id:03}")
}

impl Draft for CreateBill {
    fn empty() -> Self {
        Self {
            invoice_number: String::new(),
            job_ref: String::new(),
            date: None,
            due_date: None,
            amount: None,
            status: BillStatus::INITIAL,
            job_title: String::new(),
            client: String::new(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "invoice_number" => self.invoice_number = value.trim().to_string(),
            "job_ref" => self.job_ref = value.trim().to_string(),
            "date" => self.date = parse_optional_date(field, value)?,
            "due_date" => self.due_date = parse_optional_date(field, value)?,
            "amount" => {
                self.amount = if value.trim().is_empty() {
                    None
                } else {
                    Some(Money::parse(value)?)
                }
            }
            "status" => self.status = BillStatus::from_str(value)?,
            "job_title" => self.job_title = value.to_string(),
            "client" => self.client = value.to_string(),
            other => return Err(unknown_field("bill", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "invoice_number" => self.invoice_number.is_empty(),
            "job_ref" => self.job_ref.is_empty(),
            "date" => self.date.is_none(),
            "due_date" => self.due_date.is_none(),
            "amount" => self.amount.is_none(),
            "job_title" => self.job_title.trim().is_empty(),
            "client" => self.client.trim().is_empty(),
            _ => false,
        }
    }

    fn check(&self) -> Vec<FieldError> {
        match (self.date, self.due_date) {
            (Some(date), Some(due)) if due < date => vec![FieldError::new(
                "due_date",
                "Due date cannot be before the bill date",
            )],
            _ => Vec::new(),
        }
    }
}

impl Record for Bill {
    type Status = BillStatus;
    type Draft = CreateBill;
    type Patch = UpdateBill;

    const KIND: EntityKind = EntityKind::Bill;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> BillStatus {
        self.status
    }

    fn date(&self) -> Option<Date> {
        self.date
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "invoice_number" => Some(&self.invoice_number),
            "job_ref" => Some(&self.job_ref),
            "job_title" => Some(&self.job_title),
            "client" => Some(&self.client),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateBill) -> Self {
        let invoice_number = if draft.invoice_number.is_empty() {
            invoice_number(id)
        } else {
            draft.invoice_number
        };
        Self {
            id,
            invoice_number,
            job_ref: draft.job_ref,
            date: draft.date,
            due_date: draft.due_date,
            amount: draft.amount.unwrap_or(Money::ZERO),
            status: draft.status,
            job_title: draft.job_title,
            client: draft.client,
        }
    }

    fn to_draft(&self) -> CreateBill {
        CreateBill {
            invoice_number: self.invoice_number.clone(),
            job_ref: self.job_ref.clone(),
            date: self.date,
            due_date: self.due_date,
            amount: Some(self.amount),
            status: self.status,
            job_title: self.job_title.clone(),
            client: self.client.clone(),
        }
    }

    fn merge_draft(&mut self, draft: CreateBill) {
        *self = Self::from_draft(self.id, draft);
    }

    fn apply_patch(&mut self, patch: UpdateBill) {
        if let Some(v) = patch.job_ref {
            self.job_ref = v;
        }
        if let Some(v) = patch.date {
            self.date = Some(v);
        }
        if let Some(v) = patch.due_date {
            self.due_date = Some(v);
        }
        if let Some(v) = patch.amount {
            self.amount = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.job_title {
            self.job_title = v;
        }
        if let Some(v) = patch.client {
            self.client = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Summary cards: grand total and one subtotal per payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BillTotals {
    pub total: Money,
    pub paid: Money,
    pub unpaid: Money,
    pub overdue: Money,
}

impl BillTotals {
    pub fn compute(bills: &[Bill]) -> Self {
        let sum_of = |status: BillStatus| {
            bills
                .iter()
                .filter(|b| b.status == status)
                .map(|b| b.amount)
                .sum::<Money>()
        };
        Self {
            total: bills.iter().map(|b| b.amount).sum(),
            paid: sum_of(BillStatus::Paid),
            unpaid: sum_of(BillStatus::Unpaid),
            overdue: sum_of(BillStatus::Overdue),
        }
    }

    /// Amount still owed (unpaid plus overdue).
    pub fn outstanding(&self) -> Money {
        self.unpaid + self.overdue
    }
}

// ---------------------------------------------------------------------------
// Payment mode
// ---------------------------------------------------------------------------

/// Bill management view selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Every invoice that has been billed.
    #[default]
    Billed,
    /// Only invoices already paid.
    Paid,
}

impl PaymentMode {
    pub fn status_filter(self) -> StatusFilter<BillStatus> {
        match self {
            Self::Billed => StatusFilter::All,
            Self::Paid => StatusFilter::Only(BillStatus::Paid),
        }
    }
}

// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

/// "Search Bills" form state. Blank fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSearch {
    pub job_id: String,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    /// `None` means all statuses.
    pub payment_status: Option<BillStatus>,
}

impl BillSearch {
    /// Translate into list criteria. The job id is matched as free text so
    /// partial references (`2024-00`) work.
    pub fn to_criteria(&self) -> Criteria<BillStatus> {
        let status = self
            .payment_status
            .map_or(StatusFilter::All, StatusFilter::Only);
        let mut criteria = Criteria::default()
            .with_status(status)
            .with_search(self.job_id.trim());
        if self.date_from.is_some() || self.date_to.is_some() {
            criteria = criteria.with_date_range(DateRange::new(self.date_from, self.date_to));
        }
        criteria
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn bill(
    id: RecordId,
    job_ref: &str,
    date: &str,
    due_date: &str,
    dollars: i64,
    status: BillStatus,
    job_title: &str,
    client: &str,
) -> Bill {
    Bill {
        id,
        invoice_number: invoice_number(id),
        job_ref: job_ref.to_string(),
        date: parse_date(date),
        due_date: parse_date(due_date),
        amount: Money::from_dollars(dollars),
        status,
        job_title: job_title.to_string(),
        client: client.to_string(),
    }
}

#[rustfmt::skip]
pub fn seed_bills() -> Vec<Bill> {
    vec![
        bill(1, "JOB-2024-001", "2024-01-15", "2024-02-15", 750, BillStatus::Paid,
            "Family Court Hearing", "Smith vs Johnson"),
        bill(2, "JOB-2024-002", "2024-01-20", "2024-02-20", 450, BillStatus::Unpaid,
            "Criminal Case Deposition", "State vs Brown"),
        bill(3, "JOB-2024-003", "2024-01-10", "2024-01-25", 320, BillStatus::Overdue,
            "Civil Litigation", "ABC Corp vs XYZ Inc"),
    ]
}

pub fn bill_controller() -> Result<BillList, CoreError> {
    RecordListController::with_records(BILL_LIST, seed_bills())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::DerivedView;

    #[test]
    fn totals_partition_the_grand_total() {
        let totals = BillTotals::compute(&seed_bills());
        assert_eq!(totals.total, Money::from_dollars(1520));
        assert_eq!(totals.paid, Money::from_dollars(750));
        assert_eq!(totals.unpaid, Money::from_dollars(450));
        assert_eq!(totals.overdue, Money::from_dollars(320));
        assert_eq!(totals.paid + totals.unpaid + totals.overdue, totals.total);
        assert_eq!(totals.outstanding(), Money::from_dollars(770));
    }

    #[test]
    fn totals_of_empty_collection_are_zero() {
        assert_eq!(BillTotals::compute(&[]), BillTotals::default());
    }

    #[test]
    fn oversized_amount_is_rejected_by_the_form() {
        let mut draft = CreateBill::empty();
        assert!(draft.set_field("amount", "90000000000000000").is_err());
        assert_eq!(draft.amount, CreateBill::empty().amount);
    }

    #[test]
    fn totals_of_loaded_extreme_amounts_do_not_overflow() {
        let mut bills = seed_bills();
        for b in &mut bills {
            b.amount = Money::from_cents(i64::MAX / 2);
        }
        let totals = BillTotals::compute(&bills);
        assert_eq!(totals.total.cents(), i64::MAX);
        assert_eq!(totals.outstanding().cents(), i64::MAX - 1);
    }

    #[test]
    fn seed_invoice_numbers() {
        let numbers: Vec<_> = seed_bills().into_iter().map(|b| b.invoice_number).collect();
        assert_eq!(numbers, vec!["INV-001", "INV-002", "INV-003"]);
    }

    #[test]
    fn created_bill_gets_derived_invoice_number() {
        let mut ctl = bill_controller().unwrap();
        let mut draft = CreateBill::empty();
        draft.set_field("amount", "99.95").unwrap();
        let bill = ctl.add_record(draft);
        assert_eq!(bill.invoice_number, "INV-004");
        assert_eq!(bill.amount, Money::from_cents(9_995));
        assert_eq!(bill.status, BillStatus::Unpaid);
    }

    #[test]
    fn due_date_before_bill_date_is_rejected() {
        let mut ctl = bill_controller().unwrap();
        ctl.open_create_form();
        ctl.set_form_field("job_title", "Hearing").unwrap();
        ctl.set_form_field("date", "2024-02-10").unwrap();
        ctl.set_form_field("due_date", "2024-02-01").unwrap();
        ctl.set_form_field("amount", "100").unwrap();
        let err = ctl.submit_form().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "due_date");
    }

    #[test]
    fn payment_mode_filters() {
        let mut ctl = bill_controller().unwrap();
        ctl.set_status_filter(PaymentMode::Paid.status_filter());
        assert_eq!(ctl.view().visible_len(), 1);
        ctl.set_status_filter(PaymentMode::Billed.status_filter());
        assert_eq!(ctl.view().visible_len(), 3);
    }

    #[test]
    fn search_by_job_id_and_dates() {
        let bills = seed_bills();
        let search = BillSearch {
            job_id: "job-2024-00".to_string(),
            date_from: parse_date("2024-01-12"),
            date_to: None,
            payment_status: None,
        };
        let view = DerivedView::compute(&bills, &search.to_criteria(), &BILL_LIST);
        let ids: Vec<_> = view.visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_by_status_only() {
        let search = BillSearch {
            payment_status: Some(BillStatus::Overdue),
            ..BillSearch::default()
        };
        let criteria = search.to_criteria();
        assert!(criteria.date_range.is_none());
        let view = DerivedView::compute(&seed_bills(), &criteria, &BILL_LIST);
        assert_eq!(view.visible_len(), 1);
        assert_eq!(view.visible[0].invoice_number, "INV-003");
    }
}
