use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_attribute = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_attribute, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_attribute:?}"
    );
}

/// Assert that `form` has a control `tag` (e.g. "input" or "select") called `name`.
#[track_caller]
pub(crate) fn assert_form_control(form: &ElementRef<'_>, tag: &str, name: &str) {
    let selector = Selector::parse(&format!("{tag}[name=\"{name}\"]")).unwrap();

    assert!(
        form.select(&selector).next().is_some(),
        "No {tag} found with name \"{name}\""
    );
}

/// The value of the selected option in the select called `name`.
#[track_caller]
pub(crate) fn selected_option(form: &ElementRef<'_>, name: &str) -> String {
    let selector = Selector::parse(&format!("select[name=\"{name}\"] option[selected]")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No selected option for \"{name}\""))
        .value()
        .attr("value")
        .unwrap_or_default()
        .to_owned()
}
