// 🔎 Filter Builder - composable search predicates
//
// Each optional search parameter turns into an independent `Fragment`, or
// `None` when the parameter is absent. Fragments fold into a `Predicate` with
// AND; `None` is the identity, so an empty filter is the universal predicate.
// The same `Predicate` drives both the paged listing and the count query.

use crate::ship::ShipType;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

// ============================================================================
// FIELDS
// ============================================================================

/// Ship attributes a fragment or ordering can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Planet,
    ShipType,
    ProdDate,
    IsUsed,
    Speed,
    CrewSize,
    Rating,
}

impl Field {
    /// Column name in the `ship` table
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Planet => "planet",
            Field::ShipType => "ship_type",
            Field::ProdDate => "prod_date",
            Field::IsUsed => "is_used",
            Field::Speed => "speed",
            Field::CrewSize => "crew_size",
            Field::Rating => "rating",
        }
    }
}

// ============================================================================
// FRAGMENTS
// ============================================================================

/// One condition over one field
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Case-sensitive substring match
    Contains(Field, String),
    Equals(Field, Value),
    /// Inclusive range; at least one bound is present
    Between {
        field: Field,
        min: Option<Value>,
        max: Option<Value>,
    },
}

impl Fragment {
    /// `name` contains the given text
    pub fn name_contains(name: Option<&str>) -> Option<Fragment> {
        name.map(|n| Fragment::Contains(Field::Name, n.to_string()))
    }

    /// `planet` contains the given text
    pub fn planet_contains(planet: Option<&str>) -> Option<Fragment> {
        planet.map(|p| Fragment::Contains(Field::Planet, p.to_string()))
    }

    pub fn ship_type_is(ship_type: Option<ShipType>) -> Option<Fragment> {
        ship_type.map(|t| Fragment::Equals(Field::ShipType, Value::Text(t.as_str().to_string())))
    }

    /// Production date window in epoch millis, either bound optional
    pub fn produced_between(after: Option<i64>, before: Option<i64>) -> Option<Fragment> {
        Fragment::range(Field::ProdDate, after, before)
    }

    pub fn usage_is(is_used: Option<bool>) -> Option<Fragment> {
        is_used.map(|used| Fragment::Equals(Field::IsUsed, Value::Integer(i64::from(used))))
    }

    pub fn speed_between(min: Option<f64>, max: Option<f64>) -> Option<Fragment> {
        Fragment::range(Field::Speed, min, max)
    }

    pub fn crew_size_between(min: Option<i32>, max: Option<i32>) -> Option<Fragment> {
        Fragment::range(Field::CrewSize, min, max)
    }

    pub fn rating_between(min: Option<f64>, max: Option<f64>) -> Option<Fragment> {
        Fragment::range(Field::Rating, min, max)
    }

    fn range<T: Into<Value>>(field: Field, min: Option<T>, max: Option<T>) -> Option<Fragment> {
        if min.is_none() && max.is_none() {
            return None;
        }

        Some(Fragment::Between {
            field,
            min: min.map(Into::into),
            max: max.map(Into::into),
        })
    }

    /// Render as an SQL condition, pushing bound values onto `params`
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            // instr() is case-sensitive and takes the needle literally,
            // unlike LIKE which folds ASCII case and expands % and _
            Fragment::Contains(field, needle) => {
                params.push(Value::Text(needle.clone()));
                format!("instr({}, ?) > 0", field.column())
            }
            Fragment::Equals(field, value) => {
                params.push(value.clone());
                format!("{} = ?", field.column())
            }
            Fragment::Between { field, min, max } => match (min, max) {
                (Some(min), Some(max)) => {
                    params.push(min.clone());
                    params.push(max.clone());
                    format!("{} BETWEEN ? AND ?", field.column())
                }
                (Some(min), None) => {
                    params.push(min.clone());
                    format!("{} >= ?", field.column())
                }
                (None, Some(max)) => {
                    params.push(max.clone());
                    format!("{} <= ?", field.column())
                }
                (None, None) => "1 = 1".to_string(),
            },
        }
    }
}

// ============================================================================
// PREDICATE
// ============================================================================

/// AND of zero or more fragments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    fragments: Vec<Fragment>,
}

impl Predicate {
    /// The predicate every ship satisfies
    pub fn all() -> Self {
        Predicate::default()
    }

    /// Conjoin a fragment; `None` leaves the predicate unchanged
    pub fn and(mut self, fragment: Option<Fragment>) -> Self {
        if let Some(fragment) = fragment {
            self.fragments.push(fragment);
        }
        self
    }

    pub fn is_all(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Render as ` WHERE ...` (empty for the universal predicate) plus the
    /// positional parameters in order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();

        if self.is_all() {
            return (String::new(), params);
        }

        let conditions: Vec<String> = self
            .fragments
            .iter()
            .map(|f| f.to_sql(&mut params))
            .collect();

        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

impl FromIterator<Option<Fragment>> for Predicate {
    fn from_iter<I: IntoIterator<Item = Option<Fragment>>>(iter: I) -> Self {
        iter.into_iter().fold(Predicate::all(), Predicate::and)
    }
}

// ============================================================================
// SEARCH PARAMETERS
// ============================================================================

/// Optional search parameters shared by the listing and count endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipFilter {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    /// Epoch millis, inclusive
    pub after: Option<i64>,
    /// Epoch millis, inclusive
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_crew_size: Option<i32>,
    pub max_crew_size: Option<i32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    pub fn predicate(&self) -> Predicate {
        [
            Fragment::name_contains(self.name.as_deref()),
            Fragment::planet_contains(self.planet.as_deref()),
            Fragment::ship_type_is(self.ship_type),
            Fragment::produced_between(self.after, self.before),
            Fragment::usage_is(self.is_used),
            Fragment::speed_between(self.min_speed, self.max_speed),
            Fragment::crew_size_between(self.min_crew_size, self.max_crew_size),
            Fragment::rating_between(self.min_rating, self.max_rating),
        ]
        .into_iter()
        .collect()
    }
}

// ============================================================================
// ORDERING & PAGINATION
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    #[default]
    Id,
    Name,
    ProdDate,
    Speed,
    CrewSize,
    Rating,
}

impl ShipOrder {
    pub fn field(self) -> Field {
        match self {
            ShipOrder::Id => Field::Id,
            ShipOrder::Name => Field::Name,
            ShipOrder::ProdDate => Field::ProdDate,
            ShipOrder::Speed => Field::Speed,
            ShipOrder::CrewSize => Field::CrewSize,
            ShipOrder::Rating => Field::Rating,
        }
    }

    /// Ascending `ORDER BY` clause; ties fall back to id so pages are stable
    pub fn to_sql(self) -> String {
        match self {
            ShipOrder::Id => " ORDER BY id ASC".to_string(),
            other => format!(" ORDER BY {} ASC, id ASC", other.field().column()),
        }
    }
}

impl std::str::FromStr for ShipOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // same names the query string accepts
        match s {
            "ID" => Ok(ShipOrder::Id),
            "NAME" => Ok(ShipOrder::Name),
            "PROD_DATE" => Ok(ShipOrder::ProdDate),
            "SPEED" => Ok(ShipOrder::Speed),
            "CREW_SIZE" => Ok(ShipOrder::CrewSize),
            "RATING" => Ok(ShipOrder::Rating),
            _ => Err(format!("unknown order: {}", s)),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Fails for an empty page size
    pub fn new(number: u32, size: u32) -> Result<Self, String> {
        if size == 0 {
            return Err("pageSize must be at least 1".to_string());
        }
        Ok(Page { number, size })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Rows to skip; saturates so far-out pages land past the end
    pub fn offset(&self) -> i64 {
        i64::from(self.number)
            .checked_mul(i64::from(self.size))
            .unwrap_or(i64::MAX)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            number: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Ordering and pagination parameters of the listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub order: Option<ShipOrder>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListParams {
    pub fn order(&self) -> ShipOrder {
        self.order.unwrap_or_default()
    }

    pub fn page(&self) -> Result<Page, String> {
        Page::new(
            self.page_number.unwrap_or(0),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_universal() {
        let predicate = ShipFilter::default().predicate();

        assert!(predicate.is_all());
        assert_eq!(predicate.to_sql(), (String::new(), vec![]));
    }

    #[test]
    fn test_absent_parameters_are_identity() {
        assert_eq!(Fragment::name_contains(None), None);
        assert_eq!(Fragment::produced_between(None, None), None);
        assert_eq!(Fragment::speed_between(None, None), None);
        assert_eq!(Predicate::all().and(None).and(None), Predicate::all());
    }

    #[test]
    fn test_substring_fragment_sql() {
        let (sql, params) = Predicate::all()
            .and(Fragment::name_contains(Some("Eag")))
            .to_sql();

        assert_eq!(sql, " WHERE instr(name, ?) > 0");
        assert_eq!(params, vec![Value::Text("Eag".to_string())]);
    }

    #[test]
    fn test_range_shapes() {
        let render = |f: Option<Fragment>| Predicate::all().and(f).to_sql();

        let (sql, params) = render(Fragment::produced_between(Some(10), None));
        assert_eq!(sql, " WHERE prod_date >= ?");
        assert_eq!(params, vec![Value::Integer(10)]);

        let (sql, params) = render(Fragment::produced_between(None, Some(20)));
        assert_eq!(sql, " WHERE prod_date <= ?");
        assert_eq!(params, vec![Value::Integer(20)]);

        let (sql, params) = render(Fragment::crew_size_between(Some(5), Some(50)));
        assert_eq!(sql, " WHERE crew_size BETWEEN ? AND ?");
        assert_eq!(params, vec![Value::Integer(5), Value::Integer(50)]);

        let (sql, _) = render(Fragment::rating_between(None, Some(1.5)));
        assert_eq!(sql, " WHERE rating <= ?");
    }

    #[test]
    fn test_fragments_and_together_in_parameter_order() {
        let filter = ShipFilter {
            planet: Some("Mars".to_string()),
            ship_type: Some(ShipType::Military),
            is_used: Some(true),
            min_speed: Some(0.2),
            ..ShipFilter::default()
        };

        let (sql, params) = filter.predicate().to_sql();

        assert_eq!(
            sql,
            " WHERE instr(planet, ?) > 0 AND ship_type = ? AND is_used = ? AND speed >= ?"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("Mars".to_string()),
                Value::Text("MILITARY".to_string()),
                Value::Integer(1),
                Value::Real(0.2),
            ]
        );
    }

    #[test]
    fn test_filter_from_query_string_keys() {
        let filter: ShipFilter = serde_json::from_value(serde_json::json!({
            "shipType": "MERCHANT",
            "minCrewSize": 3,
            "maxRating": 2.5,
            "isUsed": false
        }))
        .unwrap();

        assert_eq!(filter.ship_type, Some(ShipType::Merchant));
        assert_eq!(filter.min_crew_size, Some(3));
        assert_eq!(filter.max_rating, Some(2.5));
        assert_eq!(filter.is_used, Some(false));
        assert_eq!(filter.predicate().fragments().len(), 4);
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(ShipOrder::default(), ShipOrder::Id);
        assert_eq!(ShipOrder::Id.to_sql(), " ORDER BY id ASC");
        assert_eq!(ShipOrder::ProdDate.to_sql(), " ORDER BY prod_date ASC, id ASC");
        assert_eq!("CREW_SIZE".parse::<ShipOrder>().unwrap(), ShipOrder::CrewSize);
        assert!("crew_size".parse::<ShipOrder>().is_err());
        assert!("WEIGHT".parse::<ShipOrder>().is_err());
    }

    #[test]
    fn test_page_defaults_and_window() {
        let page = ListParams::default().page().unwrap();
        assert_eq!(page, Page { number: 0, size: 3 });
        assert_eq!(page.offset(), 0);

        let page = Page::new(4, 25).unwrap();
        assert_eq!(page.limit(), 25);
        assert_eq!(page.offset(), 100);

        assert!(Page::new(0, 0).is_err());
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let page = Page::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(page.offset(), i64::MAX);

        let page = Page::new(u32::MAX, 1).unwrap();
        assert_eq!(page.offset(), i64::from(u32::MAX));
    }

    #[test]
    fn test_order_names_match_query_names() {
        for order in [
            ShipOrder::Id,
            ShipOrder::Name,
            ShipOrder::ProdDate,
            ShipOrder::Speed,
            ShipOrder::CrewSize,
            ShipOrder::Rating,
        ] {
            let name = serde_json::to_value(order).unwrap();
            let name = name.as_str().unwrap();
            assert_eq!(name.parse::<ShipOrder>().unwrap(), order);
            assert!(name.to_lowercase().parse::<ShipOrder>().is_err());
        }
    }
}
