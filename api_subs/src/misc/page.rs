use serde::Serialize;

/// One page of a listing.
#[derive(Debug, Serialize, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Number of matching rows ignoring limit and offset.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        let has_more = offset + (items.len() as i64) < total;
        ListPage {
            items,
            total,
            limit,
            offset,
            has_more,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more() {
        assert!(ListPage::new(vec![1, 2], 5, 2, 0).has_more);
        assert!(ListPage::new(vec![3, 4], 5, 2, 2).has_more);
        assert!(!ListPage::new(vec![5], 5, 2, 4).has_more);
        assert!(!ListPage::new(vec![1, 2, 3], 3, 20, 0).has_more);
        assert!(!ListPage::<i32>::new(vec![], 0, 20, 0).has_more);
    }

    #[test]
    fn test_offset_past_total() {
        let page = ListPage::<i32>::new(vec![], 3, 20, 10);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_has_more_matches_definition_for_all_small_inputs() {
        for total in 0..12i64 {
            for limit in 1..6i64 {
                for offset in 0..14i64 {
                    let len = (total - offset).clamp(0, limit);
                    let page = ListPage::new(vec![(); len as usize], total, limit, offset);
                    assert_eq!(page.has_more, offset + len < total);
                }
            }
        }
    }

    #[test]
    fn test_map_keeps_paging_fields() {
        let page = ListPage::new(vec![1, 2], 4, 2, 0).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 4);
        assert!(page.has_more);
    }
}
