//! 템플릿 조언.
//!
//! 유형별 정적 데이터 레코드와 리포트 필드 보간. 네트워크 없이 항상 성공한다.

use triage_core::models::advice::{AdviceSource, RemediationAdvice, SuggestedFix};
use triage_core::models::classification::ErrorType;
use triage_core::models::report::ErrorReport;

/// 유형별 정적 조언 데이터
#[derive(Debug, Clone, Copy)]
pub struct TemplateRecord {
    pub root_cause: &'static str,
    pub explanation: &'static str,
    pub fix_code: &'static str,
    pub fix_description: &'static str,
    pub confidence: u8,
    pub prevention_tips: &'static [&'static str],
    pub similar_patterns: &'static [&'static str],
}

/// 유형 → 레코드 (컴파일러가 모든 유형을 강제)
pub fn template_for(error_type: ErrorType) -> TemplateRecord {
    match error_type {
        ErrorType::NullReference => TemplateRecord {
            root_cause: "A property was accessed on a value that is undefined or null",
            explanation: "The code assumes an object is always populated, but at runtime the value was missing. This usually happens when async data has not loaded yet or an API returned a partial payload.",
            fix_code: "const profile = user?.profile;\nif (!profile) {\n  return renderFallback();\n}",
            fix_description: "Guard the access with optional chaining and handle the missing value explicitly",
            confidence: 85,
            prevention_tips: &[
                "Enable strictNullChecks in TypeScript",
                "Validate API responses at the boundary",
                "Render loading states until async data resolves",
            ],
            similar_patterns: &[
                "Cannot read properties of undefined (reading 'map')",
                "undefined is not an object (evaluating 'data.items')",
            ],
        },
        ErrorType::ApiTimeout => TemplateRecord {
            root_cause: "An upstream service did not respond within the allowed time",
            explanation: "The request exceeded the gateway or client timeout. The upstream may be overloaded, blocked on a slow dependency, or unreachable.",
            fix_code: "const controller = new AbortController();\nsetTimeout(() => controller.abort(), 10_000);\nawait fetchWithRetry(url, { signal: controller.signal, retries: 2 });",
            fix_description: "Set an explicit timeout and retry idempotent requests with backoff",
            confidence: 75,
            prevention_tips: &[
                "Add circuit breakers around slow dependencies",
                "Monitor p95 and p99 latency per endpoint",
                "Move long-running work to background jobs",
            ],
            similar_patterns: &["504 Gateway Timeout", "ETIMEDOUT on outbound request"],
        },
        ErrorType::AuthFailure => TemplateRecord {
            root_cause: "The request was rejected because credentials were missing, expired, or insufficient",
            explanation: "The server could not authenticate or authorize the caller. Tokens may have expired, been revoked, or lack the required scope.",
            fix_code: "if (isTokenExpired(token)) {\n  token = await refreshToken();\n}\nheaders.Authorization = `Bearer ${token}`;",
            fix_description: "Refresh expired tokens before retrying and verify the required scopes",
            confidence: 80,
            prevention_tips: &[
                "Refresh tokens proactively before expiry",
                "Centralize auth header injection in one client",
                "Alert on spikes of 401/403 responses",
            ],
            similar_patterns: &["401 Unauthorized: jwt expired", "403 Forbidden: insufficient scope"],
        },
        ErrorType::DatabaseError => TemplateRecord {
            root_cause: "A database operation failed",
            explanation: "The query could not complete. Common causes are connection pool exhaustion, constraint violations, or the database being unreachable.",
            fix_code: "try {\n  await db.withTransaction(async (session) => {\n    await repo.save(entity, { session });\n  });\n} catch (err) {\n  logger.error({ err }, 'save failed');\n  throw new ServiceError('persistence unavailable');\n}",
            fix_description: "Wrap the write in a transaction, handle constraint errors, and size the connection pool",
            confidence: 70,
            prevention_tips: &[
                "Monitor connection pool saturation",
                "Add indexes for frequent query filters",
                "Handle duplicate-key errors as conflicts, not crashes",
            ],
            similar_patterns: &[
                "E11000 duplicate key error collection",
                "connect ECONNREFUSED 127.0.0.1:27017",
            ],
        },
        ErrorType::CorsError => TemplateRecord {
            root_cause: "The browser blocked a cross-origin request",
            explanation: "The server response did not include an Access-Control-Allow-Origin header matching the calling origin, so the browser refused to expose it.",
            fix_code: "app.use(cors({\n  origin: ['https://app.example.com'],\n  credentials: true,\n}));",
            fix_description: "Allow the calling origin on the server and make sure preflight requests succeed",
            confidence: 90,
            prevention_tips: &[
                "Keep allowed origins in configuration per environment",
                "Test preflight (OPTIONS) requests in CI",
            ],
            similar_patterns: &["No 'Access-Control-Allow-Origin' header is present"],
        },
        ErrorType::MemoryLeak => TemplateRecord {
            root_cause: "The process ran out of memory",
            explanation: "Memory grew until the runtime could not allocate more. Unbounded caches, listeners that are never removed, or very large payloads are typical culprits.",
            fix_code: "useEffect(() => {\n  const handler = () => refresh();\n  window.addEventListener('resize', handler);\n  return () => window.removeEventListener('resize', handler);\n}, []);",
            fix_description: "Release listeners and timers on teardown and bound in-memory caches",
            confidence: 60,
            prevention_tips: &[
                "Capture heap snapshots in staging under load",
                "Bound caches with an eviction policy",
                "Stream large payloads instead of buffering them",
            ],
            similar_patterns: &["JavaScript heap out of memory", "Allocation failed - process out of memory"],
        },
        ErrorType::RateLimit => TemplateRecord {
            root_cause: "Requests exceeded the allowed rate",
            explanation: "The service returned 429 because too many requests arrived within its window.",
            fix_code: "const delay = Number(res.headers.get('retry-after') ?? 1) * 1000;\nawait sleep(delay);\nreturn fetch(url, options);",
            fix_description: "Honor Retry-After and throttle the client side",
            confidence: 85,
            prevention_tips: &[
                "Batch requests where the API allows it",
                "Cache responses that rarely change",
                "Track quota usage per API key",
            ],
            similar_patterns: &["429 Too Many Requests"],
        },
        ErrorType::WebsocketError => TemplateRecord {
            root_cause: "A WebSocket connection failed or dropped",
            explanation: "The persistent connection closed unexpectedly. Proxies with idle timeouts, server restarts, and network changes are common causes.",
            fix_code: "socket.onclose = () => {\n  setTimeout(connect, Math.min(30_000, 1000 * 2 ** attempts++));\n};",
            fix_description: "Reconnect with exponential backoff and send heartbeats to keep the connection alive",
            confidence: 70,
            prevention_tips: &[
                "Send periodic ping frames",
                "Raise proxy idle timeouts for WebSocket routes",
            ],
            similar_patterns: &["WebSocket connection failed", "socket hang up"],
        },
        ErrorType::ThirdPartyFailure => TemplateRecord {
            root_cause: "An external service returned an error",
            explanation: "A third-party provider failed or rejected the request. The outage may be on their side, or the request may violate their API contract.",
            fix_code: "try {\n  await provider.charge(order);\n} catch (err) {\n  await queue.enqueue('retry-charge', { orderId: order.id });\n  notifyUser('We will retry your payment shortly');\n}",
            fix_description: "Isolate the provider call, queue a retry, and degrade gracefully for the user",
            confidence: 65,
            prevention_tips: &[
                "Subscribe to provider status pages",
                "Wrap provider SDKs behind an internal interface",
                "Define fallbacks for non-critical integrations",
            ],
            similar_patterns: &["StripeConnectionError", "Twilio 503 Service Unavailable"],
        },
        ErrorType::ConfigError => TemplateRecord {
            root_cause: "Required configuration is missing or invalid",
            explanation: "The application read a configuration value or environment variable that was not set in this environment.",
            fix_code: "const apiUrl = process.env.API_URL;\nif (!apiUrl) {\n  throw new Error('API_URL must be set');\n}",
            fix_description: "Validate required configuration at startup and fail fast with a clear message",
            confidence: 80,
            prevention_tips: &[
                "Validate configuration with a schema at boot",
                "Keep .env.example in sync with required variables",
            ],
            similar_patterns: &["ReferenceError: process is not defined", "Missing environment variable"],
        },
        ErrorType::Unknown => TemplateRecord {
            root_cause: "The error did not match a known pattern",
            explanation: "No classification rule matched this report, so only generic guidance is available. Inspect the stack trace to locate the failing call.",
            fix_code: "try {\n  await operation();\n} catch (err) {\n  logger.error({ err }, 'operation failed');\n  throw err;\n}",
            fix_description: "Add structured logging around the failing operation to capture more context",
            confidence: 30,
            prevention_tips: &[
                "Add error boundaries and structured logging",
                "Attach request context to error reports",
            ],
            similar_patterns: &[],
        },
    }
}

/// 템플릿 조언 생성
///
/// 근본 원인에 위치(`path:line:col`)를, 설명에 메시지 첫 줄을 보간한다.
pub fn render(error_type: ErrorType, report: &ErrorReport) -> RemediationAdvice {
    let record = template_for(error_type);

    let root_cause = match report.location() {
        Some(location) => format!("{} in {}", record.root_cause, location),
        None => record.root_cause.to_string(),
    };

    let headline = report.headline();
    let explanation = if headline.is_empty() {
        record.explanation.to_string()
    } else {
        format!("{} Reported message: \"{}\".", record.explanation, headline)
    };

    let description = match (&report.file_path, report.line) {
        (Some(path), Some(line)) => format!("{} (see {} line {})", record.fix_description, path, line),
        (Some(path), None) => format!("{} (see {})", record.fix_description, path),
        _ => record.fix_description.to_string(),
    };

    RemediationAdvice {
        root_cause,
        explanation,
        suggested_fix: SuggestedFix {
            code: record.fix_code.to_string(),
            description,
            confidence: record.confidence.min(100),
        },
        prevention_tips: to_owned_list(record.prevention_tips),
        similar_patterns: to_owned_list(record.similar_patterns),
        source: AdviceSource::Template,
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
