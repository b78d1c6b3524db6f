#[cfg(test)]
pub mod test {
    /// A realistic client config: a dokodemo inbound ahead of the SOCKS one,
    /// an HTTP inbound, five DNS servers (one in object form), a `direct`
    /// outbound ahead of a reality vless outbound, and legacy string booleans.
    pub const FULL_CONFIG: &str = r#"{
    "log": {
        "loglevel": "info",
        "access": "/var/log/xray/access.log"
    },
    "inbounds": [
        {
            "tag": "dns-in",
            "port": 5353,
            "protocol": "dokodemo-door",
            "settings": {"address": "8.8.8.8", "port": 53, "network": "udp"}
        },
        {
            "tag": "socks-in",
            "port": 10808,
            "listen": "127.0.0.1",
            "protocol": "socks",
            "settings": {"auth": "noauth", "udp": "true"}
        },
        {
            "tag": "http-in",
            "port": 10809,
            "listen": "0.0.0.0",
            "protocol": "http"
        }
    ],
    "outbounds": [
        {"tag": "direct", "protocol": "freedom"},
        {
            "tag": "proxy",
            "protocol": "vless",
            "settings": {
                "vnext": [
                    {
                        "address": "edge.example.net",
                        "port": 8443,
                        "users": [
                            {"id": "11111111-2222-3333-4444-555555555555", "encryption": "none", "flow": "xtls-rprx-vision"}
                        ]
                    }
                ]
            },
            "streamSettings": {
                "network": "tcp",
                "security": "reality",
                "realitySettings": {
                    "publicKey": "OLDKEY",
                    "shortId": "0123",
                    "serverName": "www.example.org",
                    "fingerprint": "chrome",
                    "spx": "/"
                }
            }
        }
    ],
    "dns": {
        "servers": [
            "8.8.8.8",
            "1.1.1.1",
            {"address": "9.9.9.9", "port": 53},
            "208.67.222.222",
            "localhost"
        ]
    },
    "routing": {
        "domainStrategy": "IPIfNonMatch",
        "rules": [{"type": "field", "outboundTag": "direct", "ip": ["geoip:private"]}]
    }
}"#;

    /// A TLS (non-reality) vless client with only a SOCKS inbound and no DNS.
    pub const TLS_CONFIG: &str = r#"{
    "log": {"loglevel": "warning"},
    "inbounds": [
        {"port": 1080, "listen": "127.0.0.1", "protocol": "socks", "settings": {"udp": true, "auth": "noauth"}}
    ],
    "outbounds": [
        {
            "protocol": "vless",
            "settings": {
                "vnext": [{"address": "old.example.com", "port": 443, "users": [{"id": "old-id", "encryption": "none", "flow": ""}]}]
            },
            "streamSettings": {"network": "ws", "security": "tls", "tlsSettings": {"serverName": "old.example.com"}}
        }
    ]
}"#;

    #[test]
    fn fixtures_are_valid_json() {
        for text in [FULL_CONFIG, TLS_CONFIG] {
            let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
            assert!(parsed.is_object());
        }
    }
}
