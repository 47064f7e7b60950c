use crate::pager::{PageLabel, page_window};

use PageLabel::{Ellipsis, Page};

fn pages(labels: &[PageLabel]) -> Vec<u32> {
    labels.iter().filter_map(PageLabel::page).collect()
}

/// **VALUE**: Verifies short page counts are listed in full.
///
/// **WHY THIS MATTERS**: With seven pages or fewer an ellipsis would hide nothing.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the full-list limit.
#[test]
fn given_seven_or_fewer_pages_when_windowed_then_all_listed() {
    assert_eq!(page_window(3, 5), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    assert_eq!(page_window(1, 1), vec![Page(1)]);
    assert_eq!(pages(&page_window(7, 7)), (1..=7).collect::<Vec<_>>());
}

/// **VALUE**: Verifies the three truncation shapes on ten pages.
///
/// **WHY THIS MATTERS**: These are the layouts users see near the start, the
/// end, and the middle of a long list.
///
/// **BUG THIS CATCHES**: Would catch the boundary conditions `current <= 4`
/// and `current >= total - 3` being swapped or shifted.
#[test]
fn given_ten_pages_when_windowed_then_truncated_around_current() {
    assert_eq!(
        page_window(1, 10),
        vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
    );
    assert_eq!(
        page_window(10, 10),
        vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
    );
    assert_eq!(
        page_window(5, 10),
        vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
    );
}

/// **VALUE**: Verifies the switch points between the shapes.
///
/// **WHY THIS MATTERS**: Page 4 still belongs to the leading run and page
/// `total - 3` to the trailing run.
///
/// **BUG THIS CATCHES**: Would catch `<` written where `<=` was meant.
#[test]
fn given_boundary_pages_when_windowed_then_correct_shape_chosen() {
    assert_eq!(pages(&page_window(4, 10)), vec![1, 2, 3, 4, 5, 10]);
    assert_eq!(pages(&page_window(7, 10)), vec![1, 6, 7, 8, 9, 10]);
    assert_eq!(pages(&page_window(6, 10)), vec![1, 5, 6, 7, 10]);
}

/// **VALUE**: Verifies the window guarantees for every position in a range of sizes.
///
/// **WHY THIS MATTERS**: The pager is rendered straight from this list.
///
/// **BUG THIS CATCHES**: Would catch duplicate page numbers, a missing first
/// or last page, or the current page falling outside the window.
#[test]
fn given_any_position_when_windowed_then_window_is_well_formed() {
    for total in 1..=40 {
        for current in 1..=total {
            let labels = page_window(current, total);
            let numbers = pages(&labels);

            assert_eq!(labels.first(), Some(&Page(1)), "{current}/{total}");
            assert_eq!(labels.last(), Some(&Page(total)), "{current}/{total}");
            assert!(numbers.contains(&current), "{current}/{total}");
            assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{current}/{total}");
            assert!(labels.len() <= 7, "{current}/{total}");
        }
    }
}

/// **VALUE**: Verifies the ellipsis renders as a marker distinct from any number.
///
/// **BUG THIS CATCHES**: Would catch the marker being rendered as a page number.
#[test]
fn given_labels_when_displayed_then_ellipsis_is_distinguishable() {
    assert_eq!(Page(12).to_string(), "12");
    assert_eq!(Ellipsis.to_string(), "…");
    assert_eq!(Ellipsis.page(), None);
}
