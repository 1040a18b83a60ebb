//! Filtering a range view in place does not compile.

use treelist::view::IndexedView;

fn main() {
    let view: IndexedView<i32> = (1..=5).collect();
    let range = view.sub_range(1, 4).unwrap();
    range.retain(|_| true);
}
