//! Scripts evaluated inside rendered pages

/// Current `document.readyState`
pub const READY_STATE_SCRIPT: &str = "document.readyState";

/// Number of resource timing entries plus the ready state, used to detect network quiet
pub const NETWORK_ACTIVITY_SCRIPT: &str = r#"
    (() => ({
        resources: performance.getEntriesByType('resource').length,
        readyState: document.readyState
    }))()
"#;

/// Describes `this` element; called on a remote element handle.
///
/// Returns a JSON string so the result survives any remote-object serialization.
pub const DESCRIBE_ELEMENT_FN: &str = r#"
    function() {
        const el = this;
        const style = window.getComputedStyle(el);
        const rect = el.getBoundingClientRect();
        const visible = style.display !== 'none'
            && style.visibility !== 'hidden'
            && style.opacity !== '0'
            && (rect.width > 0 || rect.height > 0);
        const enabled = !el.disabled
            && el.getAttribute('aria-disabled') !== 'true';
        const cls = (typeof el.className === 'string' ? el.className : '').toLowerCase();
        const active = el.getAttribute('aria-selected') === 'true'
            || el.getAttribute('aria-current') === 'page'
            || el.getAttribute('aria-current') === 'true'
            || el.getAttribute('data-state') === 'active'
            || /(^|\s)(active|selected|is-active|is-selected|current)(\s|$)/.test(cls);
        const parts = [];
        let node = el;
        while (node && node.nodeType === 1 && node !== document.documentElement) {
            let index = 1;
            let sibling = node;
            while ((sibling = sibling.previousElementSibling)) index++;
            parts.unshift(node.tagName.toLowerCase() + ':nth-child(' + index + ')');
            node = node.parentElement;
        }
        return JSON.stringify({
            tag: el.tagName.toLowerCase(),
            text: (el.innerText || el.textContent || '').trim().slice(0, 200),
            ariaLabel: el.getAttribute('aria-label'),
            href: el.getAttribute('href'),
            className: cls,
            visible: visible,
            enabled: enabled,
            active: active,
            path: parts.join('>')
        });
    }
"#;

/// Pointer event sequence dispatched straight at `this`, bypassing hit testing
pub const FORCED_CLICK_FN: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const init = {
            bubbles: true,
            cancelable: true,
            view: window,
            clientX: rect.left + rect.width / 2,
            clientY: rect.top + rect.height / 2
        };
        for (const type of ['pointerdown', 'mousedown', 'pointerup', 'mouseup', 'click']) {
            const ctor = type.startsWith('pointer') && window.PointerEvent ? PointerEvent : MouseEvent;
            this.dispatchEvent(new ctor(type, init));
        }
        return true;
    }
"#;

pub const SCRIPT_CLICK_FN: &str = "function() { this.click(); return true; }";

/// Content fingerprint: scroll height and a count of repeated content items
pub const CONTENT_FINGERPRINT_SCRIPT: &str = r#"
    (() => ({
        height: Math.max(
            document.body ? document.body.scrollHeight : 0,
            document.documentElement ? document.documentElement.scrollHeight : 0
        ),
        items: document.querySelectorAll(
            'article, li, tr, [class*="item"], [class*="card"], [class*="post"]'
        ).length
    }))()
"#;

/// Scroll to the bottom and nudge scroll/resize listeners (lazy loaders,
/// intersection fallbacks)
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = r#"
    (() => {
        const height = Math.max(
            document.body ? document.body.scrollHeight : 0,
            document.documentElement ? document.documentElement.scrollHeight : 0
        );
        window.scrollTo(0, height);
        window.dispatchEvent(new Event('scroll'));
        window.dispatchEvent(new Event('resize'));
        return height;
    })()
"#;
