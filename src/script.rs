use anyhow::{bail, Result};

/// Token replaced with the URL-encoded JSON task array. The rest of the
/// template is emitted verbatim.
const TASKS_PLACEHOLDER: &str = "__KV_TASKS__";

/// Browser-console automation script. It types each queued task into the
/// target AI platform's input box, sends it, waits for generation to
/// finish, then cools down before the next task. `window.kill = true`
/// stops it.
const SCRIPT_TEMPLATE: &str = r##"(async function() {
    console.clear();
    console.log("%c Safe automation started ", "background: #000; color: #0f0; font-size: 14px");
    window.kill = false;
    const tasks = JSON.parse(decodeURIComponent("__KV_TASKS__"));

    function showStatus(text, color = "#333") {
        let el = document.getElementById('kv-status-bar');
        if (!el) {
            el = document.createElement('div');
            el.id = 'kv-status-bar';
            el.style.cssText = "position:fixed; top:20px; left:50%; transform:translateX(-50%); z-index:999999; padding:8px 16px; border-radius:4px; font-family:sans-serif; font-size:13px; font-weight:bold; color:#fff; box-shadow:0 5px 15px rgba(0,0,0,0.3);";
            document.body.appendChild(el);
        }
        el.textContent = text;
        el.style.backgroundColor = color;
    }

    function getInputBox() {
        const selectors = ['#prompt-textarea', '[contenteditable="true"]', 'textarea', '[data-testid="text-input"]'];
        for (let s of selectors) {
            let el = document.querySelector(s);
            if (el) return el;
        }
        return null;
    }

    function getSendBtn() {
        let btn = document.querySelector('[data-testid="send-button"]') ||
                  document.querySelector('button[aria-label="Send prompt"]') ||
                  document.querySelector('button[aria-label="Send"]');
        if (btn) return btn;
        let allBtns = Array.from(document.querySelectorAll('button'));
        return allBtns.find(b => {
            let t = (b.innerText || b.ariaLabel || "").toLowerCase();
            if (t.includes('stop')) return false;
            return t.includes('send') || b.innerHTML.includes('svg');
        });
    }

    function isBusy() {
        let stopBtn = document.querySelector('[aria-label="Stop generating"]') ||
                      document.querySelector('.stop-button') ||
                      document.querySelector('button[aria-label="Stop"]');
        if (stopBtn) return true;
        let sendBtn = getSendBtn();
        if (sendBtn && sendBtn.disabled) return true;
        return !!document.querySelector('.result-streaming');
    }

    showStatus("Loaded " + tasks.length + " tasks", "#444");

    for (let i = 0; i < tasks.length; i++) {
        if (window.kill) { showStatus("Stopped", "#d32f2f"); break; }

        let box = getInputBox();
        if (!box) {
            showStatus("Waiting for input box...", "#f57c00");
            await new Promise(r => setTimeout(r, 2000));
            box = getInputBox();
        }

        if (box) {
            showStatus("Writing task " + (i + 1) + "/" + tasks.length, "#1976d2");
            box.focus();
            let success = false;
            try { success = document.execCommand('insertText', false, tasks[i]); } catch (e) {}
            if (!success) {
                if (box.tagName === 'DIV' || box.contentEditable === "true") {
                    box.innerText = tasks[i];
                } else {
                    box.value = tasks[i];
                }
                box.dispatchEvent(new Event('input', { bubbles: true }));
            }
            await new Promise(r => setTimeout(r, 1000));
            let sendBtn = getSendBtn();
            if (sendBtn && !sendBtn.disabled) {
                sendBtn.click();
            } else {
                box.dispatchEvent(new KeyboardEvent('keydown', { key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true }));
            }
        }

        if (i < tasks.length - 1) {
            showStatus("Starting...", "#616161");
            await new Promise(r => setTimeout(r, 5000));
            let waitSec = 0;
            while (true) {
                if (window.kill) break;
                if (isBusy()) {
                    showStatus("Generating (" + waitSec + "s)...", "#7b1fa2");
                    await new Promise(r => setTimeout(r, 1000));
                    waitSec++;
                } else {
                    await new Promise(r => setTimeout(r, 2000));
                    if (!isBusy()) break;
                }
            }
            for (let s = 60; s > 0; s--) {
                if (window.kill) break;
                showStatus("Cooldown: " + s + "s", "#f57c00");
                await new Promise(r => setTimeout(r, 1000));
            }
        }
    }
    if (!window.kill) showStatus("All done", "#2e7d32");
})();"##;

/// Render the automation script for the given tasks.
///
/// The task array is serialized to JSON, URL-encoded, and substituted for
/// the single data placeholder; nothing else in the template is
/// interpreted. An empty task list is an error so callers never hand out
/// a script that does nothing.
pub fn generate_script(tasks: &[String]) -> Result<String> {
    if tasks.is_empty() {
        bail!("no tasks to export");
    }
    let payload = serde_json::to_string(tasks)?;
    let encoded = urlencoding::encode(&payload);
    tracing::debug!(tasks = tasks.len(), payload_len = encoded.len(), "Rendering automation script");
    Ok(SCRIPT_TEMPLATE.replacen(TASKS_PLACEHOLDER, &encoded, 1))
}
