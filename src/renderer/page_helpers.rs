//! Small helpers around chromiumoxide `Page` calls

use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use tracing::trace;

use super::DriverError;

/// Map any chromiumoxide failure onto the driver taxonomy
pub(crate) fn driver_error(err: impl std::fmt::Display) -> DriverError {
    DriverError::classify(err.to_string())
}

/// Page URL, or `about:blank` when the page has none yet or the browser did not answer
pub async fn page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(Some(url)) => url,
        Ok(None) => {
            trace!("Page URL is None (page not yet navigated)");
            "about:blank".to_string()
        }
        Err(e) => {
            trace!("Failed to get page URL: {}", e);
            "about:blank".to_string()
        }
    }
}

/// Evaluate an expression and return its JSON value, `null` when it has none
pub async fn evaluate_json(page: &Page, script: &str) -> Result<serde_json::Value, DriverError> {
    let result = page.evaluate(script).await.map_err(driver_error)?;
    Ok(result
        .into_value::<serde_json::Value>()
        .unwrap_or(serde_json::Value::Null))
}

/// Call a function declaration with `this` bound to `element`, returning its JSON value
pub async fn call_on_element(
    element: &Element,
    function: &str,
) -> Result<serde_json::Value, DriverError> {
    let returns = element
        .call_js_fn(function, false)
        .await
        .map_err(driver_error)?;
    Ok(returns.result.value.unwrap_or(serde_json::Value::Null))
}
