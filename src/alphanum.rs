use std::cmp::Ordering;

/// Case-insensitive alphanumeric comparison, the default row ordering.
///
/// Digit runs compare as numbers ("item2" < "item10"), everything else
/// compares by Unicode lowercase folding. Leading zeros within a digit run
/// break numeric ties ("07" sorts after "7").
pub(crate) fn compare(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let ord = compare_digit_runs(&mut ca, &mut cb);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    // Full lowercase expansions: some chars lowercase to
                    // more than one char ('İ' to "i\u{307}").
                    let ord = x.to_lowercase().cmp(y.to_lowercase());
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    ca.next();
                    cb.next();
                }
            }
        }
    }
}

/// Compares two digit runs numerically without parsing into an integer, so
/// arbitrarily long runs cannot overflow.
fn compare_digit_runs(
    a: &mut std::iter::Peekable<std::str::Chars<'_>>,
    b: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Ordering {
    let ra = take_digit_run(a);
    let rb = take_digit_run(b);

    let ta = ra.trim_start_matches('0');
    let tb = rb.trim_start_matches('0');

    // More significant digits wins; equal length falls back to the digits
    // themselves, then to leading-zero count for a total order.
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| ra.len().cmp(&rb.len()))
}

fn take_digit_run(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = it.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}
