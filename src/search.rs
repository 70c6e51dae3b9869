//! Free-text search and category filtering over record collections.

use crate::models::{Appointment, Document, Prescription};

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// A record that can be matched against a search query and a category.
pub trait Searchable {
    /// Text fields the query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Category label, for kinds that have one.
    fn category(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Prescription {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.prescribed_by]
    }
}

impl Searchable for Document {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl Searchable for Appointment {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.doctor_name, self.specialty.as_str()]
    }
}

/// Derives a filtered view of `records`, preserving their order.
///
/// A non-empty query keeps records where any search field contains it
/// case-insensitively; a category other than `None`/"All" keeps records whose
/// category equals it exactly. The two filters compose conjunctively, and an
/// empty query with the "All" category is the identity.
pub fn filter<T: Searchable + Clone>(
    records: &[T],
    query: &str,
    category: Option<&str>,
) -> Vec<T> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            query.is_empty()
                || r.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .filter(|r| match category {
            None => true,
            Some(ALL_CATEGORIES) => true,
            Some(wanted) => r.category() == Some(wanted),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentCategory, Frequency};
    use chrono::NaiveDate;

    fn prescription(id: u64, name: &str, prescribed_by: &str) -> Prescription {
        Prescription {
            id,
            name: name.to_string(),
            dosage: "10mg".to_string(),
            frequency: Frequency::OnceDaily,
            start_date: None,
            end_date: None,
            refill_date: None,
            prescribed_by: prescribed_by.to_string(),
            notes: None,
        }
    }

    fn document(id: u64, title: &str, category: DocumentCategory) -> Document {
        Document {
            id,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            category,
            file_size: "1.2 MB".to_string(),
            file_type: "PDF".to_string(),
        }
    }

    #[test]
    fn empty_query_and_all_category_is_identity() {
        let docs = vec![
            document(1, "Blood Test Results", DocumentCategory::LabResults),
            document(2, "Chest X-Ray", DocumentCategory::Imaging),
        ];
        assert_eq!(filter(&docs, "", Some(ALL_CATEGORIES)), docs);
        assert_eq!(filter(&docs, "", None), docs);
    }

    #[test]
    fn query_matches_case_insensitive_substrings() {
        let meds = vec![
            prescription(1, "Lisinopril", "Dr. Sarah Johnson"),
            prescription(2, "Metformin", "Dr. Emily Rodriguez"),
        ];
        let ids: Vec<_> = filter(&meds, "LISIN", None).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn query_matches_any_search_field() {
        let meds = vec![
            prescription(1, "Lisinopril", "Dr. Sarah Johnson"),
            prescription(2, "Atorvastatin", "Dr. Sarah Johnson"),
            prescription(3, "Metformin", "Dr. Emily Rodriguez"),
        ];
        let ids: Vec<_> = filter(&meds, "johnson", None).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn category_filter_requires_exact_match() {
        let docs = vec![
            document(1, "Blood Test Results", DocumentCategory::LabResults),
            document(2, "Cardiology Report", DocumentCategory::MedicalReports),
            document(3, "Allergy Test Results", DocumentCategory::LabResults),
        ];
        let ids: Vec<_> = filter(&docs, "", Some("Lab Results")).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn query_and_category_compose_conjunctively() {
        let docs = vec![
            document(1, "Blood Test Results", DocumentCategory::LabResults),
            document(2, "Allergy Test Results", DocumentCategory::LabResults),
            document(3, "MRI Scan Report", DocumentCategory::Imaging),
        ];
        let ids: Vec<_> =
            filter(&docs, "allergy", Some("Lab Results")).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn no_match_yields_empty_result() {
        let docs = vec![document(1, "Vaccination Record", DocumentCategory::MedicalReports)];
        assert!(filter(&docs, "insurance", None).is_empty());
        assert!(filter(&docs, "", Some("Imaging")).is_empty());
    }
}
