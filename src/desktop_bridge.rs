use crate::{ipc_dispatch, ALLOWED_HOSTS, SIDEBAR_BUTTON_ELEMENT_ID};

const IPC_COMMAND_PLACEHOLDER: &str = "__LUMO_IPC_COMMAND__";
const ALLOWED_HOSTS_PLACEHOLDER: &str = "__LUMO_ALLOWED_HOSTS__";
const ELEMENT_ID_PLACEHOLDER: &str = "__LUMO_SIDEBAR_ELEMENT_ID__";

// Runs before any page script in every document the shell windows load.
const BRIDGE_SCRIPT_TEMPLATE: &str = r##"
(function () {
  if (window.__lumoShell) {
    return;
  }

  const allowedHosts = __LUMO_ALLOWED_HOSTS__;

  const send = (channel, payload) => {
    const internals = window.__TAURI_INTERNALS__;
    if (!internals || typeof internals.invoke !== "function") {
      return;
    }
    internals
      .invoke("__LUMO_IPC_COMMAND__", {
        channel: channel,
        payload: payload === undefined ? null : payload,
      })
      .catch(() => {});
  };

  Object.defineProperty(window, "__lumoShell", {
    value: Object.freeze({ send: send }),
    configurable: false,
    writable: false,
  });

  const isAllowedHref = (href) => {
    try {
      return allowedHosts.includes(new URL(href).hostname);
    } catch (_) {
      return false;
    }
  };

  document.addEventListener(
    "click",
    (event) => {
      const link = event.target && event.target.closest ? event.target.closest("a") : null;
      if (!link || !link.href || link.href.startsWith("javascript:") || link.getAttribute("href") === "#") {
        return;
      }
      const opensNewWindow = link.target && link.target !== "_self" && link.target !== "_top";
      if (!opensNewWindow && isAllowedHref(link.href)) {
        return;
      }
      event.preventDefault();
      send("open-external-link", link.href);
    },
    true
  );

  window.open = function (url) {
    if (url) {
      try {
        send("open-external-link", new URL(String(url), window.location.href).href);
      } catch (_) {
        send("open-external-link", String(url));
      }
    }
    return null;
  };

  document.addEventListener("keydown", (event) => {
    if (!event.ctrlKey) {
      return;
    }
    if (event.key === "+" || event.key === "=") {
      send("zoom-in");
    } else if (event.key === "-") {
      send("zoom-out");
    } else if (event.key === "0") {
      send("zoom-reset");
    } else if (event.key === "r" || event.key === "R") {
      event.preventDefault();
      send("reload-app");
    }
  });

  document.addEventListener(
    "wheel",
    (event) => {
      if (!event.ctrlKey || event.deltaY === 0) {
        return;
      }
      event.preventDefault();
      send(event.deltaY < 0 ? "zoom-in" : "zoom-out");
    },
    { passive: false }
  );

  window.addEventListener("online", () => send("network-status", true));
  window.addEventListener("offline", () => send("network-status", false));
})();
"##;

const PAGE_ADJUSTMENT_TEMPLATE: &str = r#"
(function () {
  if (!document.getElementById("lumo-shell-style")) {
    const style = document.createElement("style");
    style.id = "lumo-shell-style";
    style.textContent = `
      ::-webkit-scrollbar { width: 5px; height: 12px; }
      ::-webkit-scrollbar-track { background: #f1f1f1; border-radius: 10px; }
      ::-webkit-scrollbar-thumb { background: #888; border-radius: 10px; }
      ::-webkit-scrollbar-thumb:hover { background: #555; }
    `;
    (document.head || document.documentElement).appendChild(style);
  }
  try {
    const sidebarButton = document.getElementById("__LUMO_SIDEBAR_ELEMENT_ID__");
    if (sidebarButton) {
      sidebarButton.style.display = "none";
    }
  } catch (_) {}
})();
"#;

fn js_string_array(values: &[&str]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn bridge_script() -> String {
    BRIDGE_SCRIPT_TEMPLATE
        .replace(ALLOWED_HOSTS_PLACEHOLDER, &js_string_array(&ALLOWED_HOSTS))
        .replace(IPC_COMMAND_PLACEHOLDER, ipc_dispatch::IPC_COMMAND)
}

/// Stylesheet injection plus best-effort sidebar suppression for the hosted page.
pub(crate) fn page_adjustment_script() -> String {
    PAGE_ADJUSTMENT_TEMPLATE.replace(ELEMENT_ID_PLACEHOLDER, SIDEBAR_BUTTON_ELEMENT_ID)
}
